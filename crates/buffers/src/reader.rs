//! Binary buffer reader with cursor tracking.

use crate::BufferError;

/// A binary buffer reader that reads data from a byte slice.
///
/// The reader maintains a cursor position and provides methods for reading
/// bytes, little-endian fixed-width integers, and raw byte runs. The plain
/// methods panic on out-of-bounds access; the `try_*` variants return
/// [`BufferError::EndOfBuffer`] instead and leave the cursor untouched.
///
/// # Example
///
/// ```
/// use protowire_buffers::Reader;
///
/// let data = [0x01, 0x02, 0x03, 0x04, 0x05];
/// let mut reader = Reader::new(&data);
///
/// assert_eq!(reader.u8(), 0x01);
/// assert_eq!(reader.u32_le(), 0x0504_0302);
/// ```
pub struct Reader<'a> {
    /// The underlying byte slice.
    pub data: &'a [u8],
    /// Current cursor position.
    pub x: usize,
    /// End position (exclusive).
    pub end: usize,
}

impl<'a> Reader<'a> {
    /// Creates a new reader for the given byte slice.
    pub fn new(data: &'a [u8]) -> Self {
        let end = data.len();
        Self { data, x: 0, end }
    }

    /// Creates a reader from a slice with custom start and end positions.
    pub fn from_slice(data: &'a [u8], x: usize, end: usize) -> Self {
        Self { data, x, end }
    }

    /// Resets the reader with a new byte slice.
    pub fn reset(&mut self, data: &'a [u8]) {
        self.x = 0;
        self.end = data.len();
        self.data = data;
    }

    /// Returns the number of remaining bytes.
    pub fn size(&self) -> usize {
        self.end - self.x
    }

    /// Returns `true` when the cursor has reached the end position.
    pub fn is_empty(&self) -> bool {
        self.x >= self.end
    }

    /// Peeks at the current byte without advancing the cursor.
    pub fn peek(&self) -> u8 {
        self.data[self.x]
    }

    /// Advances the cursor by the given number of bytes.
    pub fn skip(&mut self, length: usize) {
        self.x += length;
    }

    /// Returns a subarray of the given size and advances the cursor.
    pub fn buf(&mut self, size: usize) -> &'a [u8] {
        let x = self.x;
        let end = x + size;
        let bin = &self.data[x..end];
        self.x = end;
        bin
    }

    /// Reads an unsigned 8-bit integer.
    #[inline]
    pub fn u8(&mut self) -> u8 {
        let val = self.data[self.x];
        self.x += 1;
        val
    }

    /// Reads an unsigned 32-bit integer (little-endian).
    #[inline]
    pub fn u32_le(&mut self) -> u32 {
        let val = u32::from_le_bytes([
            self.data[self.x],
            self.data[self.x + 1],
            self.data[self.x + 2],
            self.data[self.x + 3],
        ]);
        self.x += 4;
        val
    }

    /// Reads an unsigned 64-bit integer (little-endian).
    #[inline]
    pub fn u64_le(&mut self) -> u64 {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&self.data[self.x..self.x + 8]);
        self.x += 8;
        u64::from_le_bytes(bytes)
    }

    // -----------------------------------------------------------------------
    // Bounds-checked variants – return Result<T, BufferError::EndOfBuffer>
    // instead of panicking when reading past the end of the buffer.
    // -----------------------------------------------------------------------

    /// Checks that `n` more bytes are available from the current cursor.
    #[inline]
    fn check(&self, n: usize) -> Result<(), BufferError> {
        if self.x + n > self.end {
            Err(BufferError::EndOfBuffer)
        } else {
            Ok(())
        }
    }

    /// Peeks at the current byte without advancing — returns an error when at
    /// or past the end of the buffer.
    pub fn try_peek(&self) -> Result<u8, BufferError> {
        self.check(1)?;
        Ok(self.data[self.x])
    }

    /// Reads an unsigned 8-bit integer, returning `Err` on out-of-bounds.
    #[inline]
    pub fn try_u8(&mut self) -> Result<u8, BufferError> {
        self.check(1)?;
        let val = self.data[self.x];
        self.x += 1;
        Ok(val)
    }

    /// Reads an unsigned 32-bit little-endian integer, returning `Err` on
    /// out-of-bounds.
    #[inline]
    pub fn try_u32_le(&mut self) -> Result<u32, BufferError> {
        self.check(4)?;
        Ok(self.u32_le())
    }

    /// Reads an unsigned 64-bit little-endian integer, returning `Err` on
    /// out-of-bounds.
    #[inline]
    pub fn try_u64_le(&mut self) -> Result<u64, BufferError> {
        self.check(8)?;
        Ok(self.u64_le())
    }

    /// Reads `size` raw bytes and advances the cursor, returning `Err` on
    /// out-of-bounds.
    pub fn try_buf(&mut self, size: usize) -> Result<&'a [u8], BufferError> {
        self.check(size)?;
        Ok(self.buf(size))
    }
}
