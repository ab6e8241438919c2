use super::LoadError;

pub const CHUNK_BYTES: usize = 1024 * 1024;

/// Non-zero so the kernel has to commit real pages instead of mapping the zero page.
const FILL_BYTE: u8 = 1;

/// Resident memory held for the lifetime of one invocation.
///
/// Built from independent 1 MiB chunks rather than one contiguous block.
/// Dropping the reservation releases everything.
#[derive(Debug, Default)]
pub struct MemoryReservation {
    chunks: Vec<Vec<u8>>,
}

impl MemoryReservation {
    /// Allocate and fill `memory_mb` chunks. Zero allocates nothing.
    pub fn reserve(memory_mb: usize) -> Result<Self, LoadError> {
        if memory_mb == 0 {
            return Ok(Self::default());
        }

        let exhausted = |source| LoadError::MemoryExhausted {
            requested_mb: memory_mb,
            source,
        };

        let mut chunks = Vec::new();
        chunks.try_reserve_exact(memory_mb).map_err(exhausted)?;
        for _ in 0..memory_mb {
            let mut chunk = Vec::new();
            chunk.try_reserve_exact(CHUNK_BYTES).map_err(exhausted)?;
            chunk.resize(CHUNK_BYTES, FILL_BYTE);
            chunks.push(chunk);
        }

        Ok(Self { chunks })
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn total_bytes(&self) -> usize {
        self.chunks.iter().map(Vec::len).sum()
    }

    #[cfg(test)]
    fn chunks(&self) -> impl Iterator<Item = &[u8]> {
        self.chunks.iter().map(Vec::as_slice)
    }
}
