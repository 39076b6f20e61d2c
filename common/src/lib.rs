use rand::RngCore;

/// Random payload of `payload_size` bytes drawn from `rng`
pub fn generate_payload<R: RngCore + ?Sized>(rng: &mut R, payload_size: usize) -> Vec<u8> {
    let mut payload = vec![0u8; payload_size];
    rng.fill_bytes(&mut payload);
    payload
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{thread_rng, SeedableRng};

    #[test]
    fn payload_has_requested_size() {
        assert_eq!(generate_payload(&mut thread_rng(), 0).len(), 0);
        assert_eq!(generate_payload(&mut thread_rng(), 10 * 1024).len(), 10 * 1024);
    }

    #[test]
    fn seeded_payloads_repeat() {
        let a = generate_payload(&mut StdRng::seed_from_u64(7), 64);
        let b = generate_payload(&mut StdRng::seed_from_u64(7), 64);
        assert_eq!(a, b);
        assert!(a.iter().any(|byte| *byte != 0));
    }
}
