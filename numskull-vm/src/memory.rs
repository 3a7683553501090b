use ahash::AHashMap;

/// Sparse memory. Any number is an address, and an address that was never
/// written reads back as itself.
#[derive(Debug, Default, Clone)]
pub struct Memory {
    cells: AHashMap<u64, f64>,
}

/// `-0` and `0` share a slot. NaN has no slot.
fn key(address: f64) -> Option<u64> {
    if address.is_nan() {
        None
    } else if address == 0.0 {
        Some(0.0f64.to_bits())
    } else {
        Some(address.to_bits())
    }
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(&self, address: f64) -> f64 {
        key(address)
            .and_then(|k| self.cells.get(&k).copied())
            .unwrap_or(address)
    }

    pub fn write(&mut self, address: f64, value: f64) {
        match key(address) {
            Some(k) => {
                self.cells.insert(k, value);
            }
            None => tracing::trace!(value, "write to NaN address discarded"),
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwritten_reads_itself() {
        let mem = Memory::new();
        for x in [0.0, -0.0, 1.0, -7.5, 1e300, f64::INFINITY] {
            assert_eq!(mem.read(x).to_bits(), x.to_bits());
            assert_eq!(mem.read(x).to_bits(), x.to_bits());
        }
        assert!(mem.read(f64::NAN).is_nan());
        assert!(mem.is_empty());
    }

    #[test]
    fn write_then_overwrite() {
        let mut mem = Memory::new();
        mem.write(3.0, 10.0);
        assert_eq!(mem.read(3.0), 10.0);
        mem.write(3.0, -2.0);
        assert_eq!(mem.read(3.0), -2.0);
        assert_eq!(mem.len(), 1);
        assert_eq!(mem.read(4.0), 4.0);
    }

    #[test]
    fn signed_zero_is_one_address() {
        let mut mem = Memory::new();
        mem.write(-0.0, 9.0);
        assert_eq!(mem.read(0.0), 9.0);
        mem.write(0.0, 1.0);
        assert_eq!(mem.read(-0.0), 1.0);
        assert_eq!(mem.len(), 1);
    }

    #[test]
    fn nan_writes_are_dropped() {
        let mut mem = Memory::new();
        mem.write(f64::NAN, 1.0);
        assert!(mem.is_empty());
        assert!(mem.read(f64::NAN).is_nan());
    }
}
