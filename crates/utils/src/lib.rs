use rand::Rng;

/// Creates a random alphanumeric secret of the given length
pub fn create_random_secret(secret_len: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();
    (0..secret_len)
        .map(|_| {
            let pos = rng.gen_range(0..CHARSET.len());
            CHARSET[pos] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_secret_of_given_length() {
        for len in [0, 1, 16, 64].iter() {
            assert_eq!(create_random_secret(*len).len(), *len);
        }
    }
}
