use hex_literal::hex;

pub const DEFAULT_HIDDEN_PUZZLE: [u8; 3] = hex!("ff0980");

pub const DEFAULT_HIDDEN_PUZZLE_HASH: [u8; 32] = hex!(
    "
    711d6c4e32c92e53179b199484cf8c897542bc57f2b22582799f9d657eec4699
    "
);
