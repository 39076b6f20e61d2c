use bytes::Bytes;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Fills the payload written by every file of a run
pub struct BufferFactory {
    rng: Box<dyn RngCore + Send>,
}

impl BufferFactory {
    pub fn new(rng: Box<dyn RngCore + Send>) -> BufferFactory {
        BufferFactory { rng }
    }

    pub fn from_entropy() -> BufferFactory {
        BufferFactory::new(Box::new(StdRng::from_entropy()))
    }

    pub fn seeded(seed: u64) -> BufferFactory {
        BufferFactory::new(Box::new(StdRng::seed_from_u64(seed)))
    }

    /// Fresh random buffer. Cloning the returned `Bytes` shares the same memory.
    pub fn buffer(&mut self, size: usize) -> Bytes {
        Bytes::from(common::generate_payload(&mut *self.rng, size))
    }
}
