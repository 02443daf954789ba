//! Strategies for verifying a data record's checksum trailer.

/// Decide whether a data record is intact.
///
/// Receives the full record, including its two-byte checksum trailer.
pub trait Checksum {
    fn verify(&self, record: &[u8]) -> bool;
}

impl<C: Checksum + ?Sized> Checksum for &C {
    fn verify(&self, record: &[u8]) -> bool {
        (**self).verify(record)
    }
}

/// Accept every record.
#[derive(Debug, Default, Clone, Copy)]
pub struct AcceptAll;

impl Checksum for AcceptAll {
    fn verify(&self, _: &[u8]) -> bool {
        true
    }
}

/// The logger's own framing: a `*` separator, then the XOR of every
/// preceding record byte.
#[derive(Debug, Default, Clone, Copy)]
pub struct StarXor;

impl Checksum for StarXor {
    fn verify(&self, record: &[u8]) -> bool {
        let [body @ .., separator, found] = record else {
            return false;
        };

        *separator == b'*' && *found == compute_xor(body)
    }
}

/// Accumulate a slice of bytes into an XOR checksum.
pub fn compute_xor(r: &[u8]) -> u8 {
    r.iter().fold(0, |acc, b| acc ^ b)
}
