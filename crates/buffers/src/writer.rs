//! Binary buffer writer with auto-growing capacity.

/// A binary buffer writer that grows automatically as needed.
///
/// # Example
///
/// ```
/// use protowire_buffers::Writer;
///
/// let mut writer = Writer::new();
/// writer.u8(0x01);
/// writer.u32_le(0x0203_0405);
/// let data = writer.flush();
/// assert_eq!(data, [0x01, 0x05, 0x04, 0x03, 0x02]);
/// ```
pub struct Writer {
    /// The underlying byte buffer.
    pub data: Vec<u8>,
    /// Position where last flush happened.
    pub x0: usize,
    /// Current cursor position.
    pub x: usize,
    /// Allocation size when buffer needs to grow.
    alloc_size: usize,
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer {
    /// Creates a new writer with default allocation size (4KB).
    pub fn new() -> Self {
        Self::with_alloc_size(4 * 1024)
    }

    /// Creates a new writer with custom allocation size.
    pub fn with_alloc_size(alloc_size: usize) -> Self {
        let data = vec![0u8; alloc_size];
        Self {
            data,
            x0: 0,
            x: 0,
            alloc_size,
        }
    }

    /// Ensures the buffer has at least `capacity` bytes available.
    pub fn ensure_capacity(&mut self, capacity: usize) {
        let remaining = self.data.len() - self.x;
        if remaining < capacity {
            let total = self.data.len() - self.x0;
            let required = capacity - remaining;
            let total_required = total + required;
            let new_size = if total_required <= self.alloc_size {
                self.alloc_size
            } else {
                total_required * 2
            };
            self.grow(new_size);
        }
    }

    fn grow(&mut self, new_size: usize) {
        let x0 = self.x0;
        let x = self.x;
        let mut new_buf = vec![0u8; new_size];
        new_buf[..x - x0].copy_from_slice(&self.data[x0..x]);
        self.data = new_buf;
        self.x = x - x0;
        self.x0 = 0;
    }

    /// Resets the flush position.
    pub fn reset(&mut self) {
        self.x0 = self.x;
    }

    /// Returns the number of bytes written since the last flush.
    pub fn size(&self) -> usize {
        self.x - self.x0
    }

    /// Returns the written data and advances the flush position.
    pub fn flush(&mut self) -> Vec<u8> {
        let result = self.data[self.x0..self.x].to_vec();
        self.x0 = self.x;
        result
    }

    /// Writes an unsigned 8-bit integer.
    #[inline]
    pub fn u8(&mut self, val: u8) {
        self.ensure_capacity(1);
        self.data[self.x] = val;
        self.x += 1;
    }

    /// Writes an unsigned 32-bit integer (little-endian).
    #[inline]
    pub fn u32_le(&mut self, val: u32) {
        self.ensure_capacity(4);
        let bytes = val.to_le_bytes();
        self.data[self.x..self.x + 4].copy_from_slice(&bytes);
        self.x += 4;
    }

    /// Writes an unsigned 64-bit integer (little-endian).
    #[inline]
    pub fn u64_le(&mut self, val: u64) {
        self.ensure_capacity(8);
        let bytes = val.to_le_bytes();
        self.data[self.x..self.x + 8].copy_from_slice(&bytes);
        self.x += 8;
    }

    /// Writes a byte slice.
    pub fn buf(&mut self, buf: &[u8]) {
        let length = buf.len();
        self.ensure_capacity(length);
        self.data[self.x..self.x + length].copy_from_slice(buf);
        self.x += length;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u8() {
        let mut writer = Writer::new();
        writer.u8(0x01);
        writer.u8(0x02);
        assert_eq!(writer.flush(), vec![0x01, 0x02]);
    }

    #[test]
    fn test_u32_le() {
        let mut writer = Writer::new();
        writer.u32_le(0x0403_0201);
        assert_eq!(writer.flush(), vec![0x01, 0x02, 0x03, 0x04]);
    }

    #[test]
    fn test_u64_le() {
        let mut writer = Writer::new();
        writer.u64_le(0x0807_0605_0403_0201);
        assert_eq!(writer.flush(), vec![0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08]);
    }

    #[test]
    fn test_buf() {
        let mut writer = Writer::new();
        writer.buf(b"hello");
        writer.u8(0x21);
        assert_eq!(writer.flush(), b"hello\x21");
    }

    #[test]
    fn test_flush_twice() {
        let mut writer = Writer::new();
        writer.u8(1);
        assert_eq!(writer.flush(), vec![1]);
        writer.u8(2);
        // Second flush returns only the bytes written after the first.
        assert_eq!(writer.flush(), vec![2]);
    }

    #[test]
    fn test_grow() {
        let mut writer = Writer::with_alloc_size(4);
        let payload: Vec<u8> = (0..=255).collect();
        writer.buf(&payload);
        assert_eq!(writer.flush(), payload);
    }

    #[test]
    fn test_size() {
        let mut writer = Writer::new();
        assert_eq!(writer.size(), 0);
        writer.u32_le(7);
        assert_eq!(writer.size(), 4);
        writer.flush();
        assert_eq!(writer.size(), 0);
    }
}
