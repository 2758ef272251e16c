use digest::Digest;

/// Incremental hasher whose algorithm is chosen at runtime.
pub trait Hasher: Send {
    fn update(&mut self, data: &[u8]);
    fn finalize(self: Box<Self>) -> Vec<u8>;
}

/// Adapts any RustCrypto [`Digest`] to [`Hasher`].
pub struct DigestHasher<D>(D);

impl<D: Digest> DigestHasher<D> {
    pub fn new() -> Self { Self(D::new()) }
}

impl<D: Digest> Default for DigestHasher<D> {
    fn default() -> Self { Self::new() }
}

impl<D: Digest + Send> Hasher for DigestHasher<D> {
    fn update(&mut self, data: &[u8]) { Digest::update(&mut self.0, data); }
    fn finalize(self: Box<Self>) -> Vec<u8> { self.0.finalize().to_vec() }
}

#[cfg(feature = "sha2")]
pub type Sha256Hasher = DigestHasher<sha2::Sha256>;

#[cfg(feature = "blake3")]
pub struct Blake3Hasher(blake3::Hasher);

#[cfg(feature = "blake3")]
impl Blake3Hasher {
    pub fn new() -> Self { Self(blake3::Hasher::new()) }
}

#[cfg(feature = "blake3")]
impl Default for Blake3Hasher {
    fn default() -> Self { Self::new() }
}

#[cfg(feature = "blake3")]
impl Hasher for Blake3Hasher {
    fn update(&mut self, data: &[u8]) { self.0.update(data); }
    fn finalize(self: Box<Self>) -> Vec<u8> { self.0.finalize().as_bytes().to_vec() }
}
