//! Finding the definition of a line type id. Compiled lumps are searched
//! first, then text definitions. Every caller gets its own copy.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use bincode::Options;
use log::{debug, info, trace};

use crate::XgError;
use crate::xg::defs::DefsFile;
use crate::xg::line_type::{LineType, RawLineType};

const LUMP_MAGIC: &[u8; 4] = b"XGLT";
const LUMP_VERSION: u32 = 1;
const HEADER_LEN: usize = 12;

#[derive(Debug, Default)]
pub struct TypeResolver {
    lump: Vec<RawLineType>,
    /// Keyed by the id as text
    text: HashMap<String, RawLineType>,
}

impl TypeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the types in a compiled lump. Returns how many were read.
    pub fn load_lump(&mut self, data: &[u8]) -> Result<usize, XgError> {
        if data.len() < HEADER_LEN || &data[0..4] != LUMP_MAGIC {
            return Err(XgError::BadLump("missing header".to_string()));
        }
        let word = |at: usize| u32::from_le_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]]);
        let version = word(4);
        if version != LUMP_VERSION {
            return Err(XgError::BadLump(format!("version {version} is not {LUMP_VERSION}")));
        }
        let payload = &data[HEADER_LEN..];
        if crc32fast::hash(payload) != word(8) {
            return Err(XgError::BadLump("checksum mismatch".to_string()));
        }

        // Same encoding as `bincode::serialize`, but a length prefix can't
        // ask for more than the payload holds
        let types: Vec<RawLineType> = bincode::options()
            .with_fixint_encoding()
            .allow_trailing_bytes()
            .with_limit(payload.len() as u64)
            .deserialize(payload)?;
        let count = types.len();
        self.lump.extend(types);
        debug!("Loaded {count} line types from lump");
        Ok(count)
    }

    pub fn load_lump_file(&mut self, path: &Path) -> Result<usize, XgError> {
        let data = fs::read(path)?;
        self.load_lump(&data)
    }

    /// Add the types in a TOML definitions file. Later definitions of an id
    /// replace earlier ones.
    pub fn load_text(&mut self, text: &str) -> Result<usize, XgError> {
        let file = DefsFile::parse(text)?;
        for def in file.line_types.iter() {
            self.insert(def.to_raw()?);
        }
        Ok(file.line_types.len())
    }

    pub fn load_text_file(&mut self, path: &Path) -> Result<usize, XgError> {
        let text = fs::read_to_string(path)?;
        let count = self.load_text(&text)?;
        info!("Loaded {count} line types from {}", path.display());
        Ok(count)
    }

    /// Add a single type to the text definitions
    pub fn insert(&mut self, raw: RawLineType) {
        self.text.insert(raw.id.to_string(), raw);
    }

    pub fn is_empty(&self) -> bool {
        self.lump.is_empty() && self.text.is_empty()
    }

    /// Text definitions, in id order
    pub fn text_types(&self) -> Vec<&RawLineType> {
        let mut types: Vec<_> = self.text.values().collect();
        types.sort_by_key(|t| t.id);
        types
    }

    /// Look up a line type. The result is owned by the caller.
    pub fn resolve(&self, id: i32) -> Result<LineType, XgError> {
        if id == 0 {
            return Err(XgError::NotFound(id));
        }
        if let Some(raw) = self.lump.iter().find(|t| t.id == id) {
            return LineType::from_raw(raw);
        }
        if let Some(raw) = self.text.get(&id.to_string()) {
            return LineType::from_raw(raw);
        }
        LineType::from_raw(&auto_generate(id)?)
    }
}

/// Types generated from numeric ranges of older line specials. None of the
/// ranges are generated yet.
fn auto_generate(id: i32) -> Result<RawLineType, XgError> {
    trace!("No generated line type for {id}");
    Err(XgError::NotFound(id))
}

/// Build a lump that `TypeResolver::load_lump` reads back
pub fn compile_lump(types: &[RawLineType]) -> Result<Vec<u8>, XgError> {
    let payload = bincode::serialize(types)?;
    let mut lump = Vec::with_capacity(HEADER_LEN + payload.len());
    lump.extend_from_slice(LUMP_MAGIC);
    lump.extend_from_slice(&LUMP_VERSION.to_le_bytes());
    lump.extend_from_slice(&crc32fast::hash(&payload).to_le_bytes());
    lump.extend_from_slice(&payload);
    Ok(lump)
}

#[cfg(test)]
mod tests {
    use super::{compile_lump, TypeResolver, HEADER_LEN, LUMP_MAGIC, LUMP_VERSION};
    use crate::XgError;
    use crate::xg::class::ClassId;
    use crate::xg::line_type::RawLineType;

    fn raw(id: i32, class: ClassId) -> RawLineType {
        RawLineType {
            id,
            line_class: class as u8,
            ..RawLineType::default()
        }
    }

    #[test]
    fn lump_comes_before_text() {
        let lump = compile_lump(&[raw(100, ClassId::Damage)]).unwrap();
        let mut resolver = TypeResolver::new();
        resolver.insert(raw(100, ClassId::Key));
        resolver.insert(raw(101, ClassId::Music));
        assert_eq!(resolver.load_lump(&lump).unwrap(), 1);

        assert_eq!(resolver.resolve(100).unwrap().class, ClassId::Damage);
        assert_eq!(resolver.resolve(101).unwrap().class, ClassId::Music);
        assert!(matches!(resolver.resolve(102), Err(XgError::NotFound(102))));
        assert!(matches!(resolver.resolve(0), Err(XgError::NotFound(0))));
    }

    #[test]
    fn each_resolve_is_a_new_copy() {
        let mut resolver = TypeResolver::new();
        resolver.insert(raw(7, ClassId::Key));
        let mut first = resolver.resolve(7).unwrap();
        first.act_count = 99;
        assert_eq!(resolver.resolve(7).unwrap().act_count, -1);
    }

    #[test]
    fn damaged_lumps_are_refused() {
        let mut lump = compile_lump(&[raw(1, ClassId::Damage), raw(2, ClassId::Power)]).unwrap();
        let mut resolver = TypeResolver::new();
        assert!(matches!(resolver.load_lump(&lump[..8]), Err(XgError::BadLump(_))));

        let last = lump.len() - 1;
        lump[last] ^= 0xff;
        assert!(matches!(resolver.load_lump(&lump), Err(XgError::BadLump(_))));

        lump[0] = b'Z';
        assert!(matches!(resolver.load_lump(&lump), Err(XgError::BadLump(_))));
        assert!(resolver.is_empty());
    }

    #[test]
    fn oversized_length_is_refused() {
        // Valid header and checksum over a vector claiming u64::MAX entries
        let payload = u64::MAX.to_le_bytes();
        let mut lump = Vec::with_capacity(HEADER_LEN + payload.len());
        lump.extend_from_slice(LUMP_MAGIC);
        lump.extend_from_slice(&LUMP_VERSION.to_le_bytes());
        lump.extend_from_slice(&crc32fast::hash(&payload).to_le_bytes());
        lump.extend_from_slice(&payload);

        let mut resolver = TypeResolver::new();
        assert!(matches!(resolver.load_lump(&lump), Err(XgError::BadLump(_))));
        assert!(resolver.is_empty());
    }

    #[test]
    fn text_types_sorted() {
        let mut resolver = TypeResolver::new();
        resolver.insert(raw(30, ClassId::Key));
        resolver.insert(raw(4, ClassId::Key));
        resolver.insert(raw(12, ClassId::Key));
        let ids: Vec<i32> = resolver.text_types().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![4, 12, 30]);
    }
}
