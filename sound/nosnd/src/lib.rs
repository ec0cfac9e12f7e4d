//! A sound server with no device. Every action is logged, and a short
//! history is kept so a headless run can report what would have played.

use std::{
    error::Error,
    fmt::Display,
    sync::mpsc::{channel, Receiver, Sender},
};

use log::debug;

use sound_traits::{InitResult, SoundAction, SoundServer, SoundServerTic};

/// Sound effects and songs are plain definition ids
pub type SfxId = i32;
pub type MusId = i32;

pub type SndServerRx = Receiver<SoundAction<SfxId, MusId>>;
pub type SndServerTx = Sender<SoundAction<SfxId, MusId>>;

/// What the server was asked to do, in order
#[derive(Debug, Clone, PartialEq)]
pub enum Played {
    Sfx { uid: usize, sfx: SfxId, x: f32, y: f32 },
    Music { id: MusId, looping: bool },
}

pub struct Snd {
    rx: SndServerRx,
    tx: SndServerTx,
    history: Vec<Played>,
}

impl Snd {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        let (tx, rx) = channel();
        Ok(Self {
            rx,
            tx,
            history: Vec::new(),
        })
    }

    pub fn history(&self) -> &[Played] {
        &self.history
    }
}

#[derive(Debug)]
pub enum SndError {
    None,
}

impl Display for SndError {
    fn fmt(&self, _: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Ok(())
    }
}

impl std::error::Error for SndError {}

impl SoundServer<SfxId, MusId, SndError> for Snd {
    fn init(&mut self) -> InitResult<SfxId, MusId, SndError> {
        Ok(self.tx.clone())
    }

    fn start_sound(&mut self, uid: usize, sfx: SfxId, x: f32, y: f32) {
        debug!("sfx {sfx} from {uid} at ({x}, {y})");
        self.history.push(Played::Sfx { uid, sfx, x, y });
    }

    fn start_music(&mut self, id: MusId, looping: bool) {
        debug!("music {id}, looping: {looping}");
        self.history.push(Played::Music { id, looping });
    }

    fn get_rx(&mut self) -> &mut SndServerRx {
        &mut self.rx
    }
}

impl SoundServerTic<SfxId, MusId, SndError> for Snd {}

#[cfg(test)]
mod tests {
    use sound_traits::{SoundAction, SoundServer, SoundServerTic};

    use crate::{Played, Snd};

    #[test]
    fn records_history() {
        let mut snd = Snd::new().unwrap();
        let tx = snd.init().unwrap();
        tx.send(SoundAction::StartMusic(4, false)).unwrap();
        tx.send(SoundAction::StartSfx {
            uid: 9,
            sfx: 31,
            x: 1.0,
            y: 2.0,
        })
        .unwrap();
        assert_eq!(snd.drain(), 2);
        assert_eq!(
            snd.history(),
            &[
                Played::Music {
                    id: 4,
                    looping: false
                },
                Played::Sfx {
                    uid: 9,
                    sfx: 31,
                    x: 1.0,
                    y: 2.0
                }
            ]
        );
    }
}
