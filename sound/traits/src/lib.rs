//! The channel protocol between the play simulation and whatever plays sound.
//! The simulation only ever sends; a `SoundServer` owns the receiving end and
//! drains it once per tic.

use std::{
    fmt::Debug,
    sync::mpsc::{Receiver, Sender},
    time::Duration,
};

/// `S` is SFX id, `M` is Music id, `E` is Errors
pub type InitResult<S, M, E> = Result<Sender<SoundAction<S, M>>, E>;

#[derive(Debug, Clone, PartialEq)]
pub enum SoundAction<S: Debug + Copy, M: Debug> {
    StartSfx {
        /// Objects unique ID or hash. Tells which object or sector owns
        /// the sound.
        uid: usize,
        /// The Sound effect this object has
        sfx: S,
        /// The world XY coords of this object
        x: f32,
        y: f32,
    },
    /// Music ID and looping/not
    StartMusic(M, bool),
}

pub trait SoundServer<S, M, E>
where
    S: Debug + Copy,
    M: Debug,
    E: std::error::Error,
{
    /// Start up all sound stuff and grab the `Sender` channel for cloning
    fn init(&mut self) -> InitResult<S, M, E>;

    /// Playback a sound
    fn start_sound(&mut self, uid: usize, sfx: S, x: f32, y: f32);

    /// Start a song. An unknown id is ignored by the server.
    fn start_music(&mut self, music: M, looping: bool);

    /// Helper function used by the `SoundServerTic` trait
    fn get_rx(&mut self) -> &mut Receiver<SoundAction<S, M>>;
}

/// Run the `SoundServer`
pub trait SoundServerTic<S, M, E>
where
    Self: SoundServer<S, M, E>,
    S: Debug + Copy,
    M: Debug,
    E: std::error::Error,
{
    fn handle(&mut self, sound: SoundAction<S, M>) {
        match sound {
            SoundAction::StartSfx { uid, sfx, x, y } => self.start_sound(uid, sfx, x, y),
            SoundAction::StartMusic(music, looping) => self.start_music(music, looping),
        }
    }

    /// Handle at most one pending action, waiting briefly for it. Returns
    /// `true` if one was handled.
    fn tic(&mut self) -> bool {
        match self.get_rx().recv_timeout(Duration::from_micros(500)) {
            Ok(sound) => {
                self.handle(sound);
                true
            }
            Err(_) => false,
        }
    }

    /// Handle everything currently queued without waiting. Returns how many
    /// actions were handled.
    fn drain(&mut self) -> usize {
        let pending: Vec<_> = self.get_rx().try_iter().collect();
        let count = pending.len();
        for sound in pending {
            self.handle(sound);
        }
        count
    }
}
