use rand::Rng;

/// Four digit numeric code, 1000..=9999.
pub fn gen_random_verify_code() -> u32 {
    rand::thread_rng().gen_range(1000..10000)
}

//fixed length decimal string, leading zeros allowed
pub fn gen_random_digits(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}
