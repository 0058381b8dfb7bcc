//! Fire-and-forget sound triggers
//!
//! The controller holds an optional sink and never learns whether a sound
//! actually played.

use std::io::{Stderr, Write};

/// Something that can play the game's two sounds
pub trait AudioSink {
    fn play_eat(&mut self);
    fn play_crash(&mut self);
}

/// Rings the terminal bell
pub struct TerminalBell {
    out: Stderr,
    ring_on_eat: bool,
}

impl TerminalBell {
    pub fn new(ring_on_eat: bool) -> Self {
        Self {
            out: std::io::stderr(),
            ring_on_eat,
        }
    }

    fn ring(&mut self) {
        // The terminal may not support a bell; nothing to do about it
        let _ = self.out.write_all(b"\x07").and_then(|_| self.out.flush());
    }
}

impl AudioSink for TerminalBell {
    fn play_eat(&mut self) {
        if self.ring_on_eat {
            self.ring();
        }
    }

    fn play_crash(&mut self) {
        self.ring();
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::AudioSink;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Sound {
        Eat,
        Crash,
    }

    /// Records every trigger into a shared log
    #[derive(Clone, Default)]
    pub struct RecordingAudio {
        pub played: Rc<RefCell<Vec<Sound>>>,
    }

    impl AudioSink for RecordingAudio {
        fn play_eat(&mut self) {
            self.played.borrow_mut().push(Sound::Eat);
        }

        fn play_crash(&mut self) {
            self.played.borrow_mut().push(Sound::Crash);
        }
    }
}
