pub trait DerivableKey {
    fn derive_unhardened(&self, idx: u32) -> Self;
}
