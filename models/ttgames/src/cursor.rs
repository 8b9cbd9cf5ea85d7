use byteorder::{
	BE,
	LE,
	ReadBytesExt
};

use half::f16;

use std::io::{
	Cursor,
	Result as IOResult
};

use rgk_core::io_ext::ReadBinExt;

use crate::import::TTImportError;

/// Byte order applied to multi-byte reads
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Endian {
	Big,
	Little,
}

/// Generates a read method which honours the cursor's current byte order
macro_rules! read_ordered {
	($name: ident, $t: ty, $read: ident) => {
		#[inline]
		pub fn $name(&mut self) -> Result<$t, TTImportError> {
			match self.endian {
				Endian::Big => self.guard(|b| b.$read::<BE>()),
				Endian::Little => self.guard(|b| b.$read::<LE>()),
			}
		}
	}
}

/// Seekable reader over an in-memory file.
///
/// The byte order is a mode: it applies to every multi-byte read until it is
/// changed again. Reads past the end of the buffer fail with
/// [`TTImportError::Truncated`], carrying the offset the read started at.
pub struct ByteCursor<'a> {
	inner: Cursor<&'a [u8]>,
	endian: Endian,
}

impl<'a> ByteCursor<'a> {
	/// Creates a big endian cursor positioned at the start of `data`
	pub fn new(data: &'a [u8]) -> ByteCursor<'a> {
		ByteCursor {
			inner: Cursor::new(data),
			endian: Endian::Big,
		}
	}

	pub fn endian(&self) -> Endian {
		self.endian
	}

	pub fn set_endian(&mut self, endian: Endian) {
		self.endian = endian;
	}

	pub fn position(&self) -> u64 {
		self.inner.position()
	}

	/// Total length of the underlying buffer
	pub fn len(&self) -> u64 {
		self.inner.get_ref().len() as u64
	}

	/// Bytes left between the current position and the end of the buffer
	pub fn remaining(&self) -> u64 {
		self.len().saturating_sub(self.position())
	}

	pub fn at_end(&self) -> bool {
		self.position() >= self.len()
	}

	/// Seeks to an absolute offset. Seeking past the end is allowed; the next
	/// read will fail.
	pub fn seek(&mut self, pos: u64) {
		self.inner.set_position(pos);
	}

	/// Skips `count` bytes relative to the current position
	pub fn skip(&mut self, count: u64) {
		let pos = self.position().saturating_add(count);
		self.inner.set_position(pos);
	}

	fn guard<T, F>(&mut self, read: F) -> Result<T, TTImportError>
	where
		F: FnOnce(&mut Cursor<&'a [u8]>) -> IOResult<T>,
	{
		let offset = self.position();
		read(&mut self.inner).map_err(|_| TTImportError::Truncated { offset })
	}

	#[inline]
	pub fn read_u8(&mut self) -> Result<u8, TTImportError> {
		self.guard(|b| b.read_u8())
	}

	read_ordered!(read_u16, u16, read_u16);
	read_ordered!(read_u32, u32, read_u32);
	read_ordered!(read_f32, f32, read_f32);

	/// Reads an IEEE 754 half precision float, widened to `f32`
	#[inline]
	pub fn read_f16(&mut self) -> Result<f32, TTImportError> {
		let bits = self.read_u16()?;
		Ok(f16::from_bits(bits).to_f32())
	}

	/// Reads `N` raw bytes. Byte order does not apply.
	pub fn read_tag<const N: usize>(&mut self) -> Result<[u8; N], TTImportError> {
		self.guard(|b| b.read_tag::<N>())
	}

	pub fn read_cstr(&mut self) -> Result<String, TTImportError> {
		self.guard(|b| b.read_cstr())
	}

	/// Reads two null-terminated strings and keeps the first
	pub fn read_cstr_pair(&mut self) -> Result<String, TTImportError> {
		self.guard(|b| b.read_cstr_pair())
	}

	/// Reads `N` bytes and checks them against `sig`
	pub fn expect_signature<const N: usize>(&mut self, sig: &[u8; N]) -> Result<(), TTImportError> {
		let offset = self.position();
		let found = self.read_tag::<N>()?;
		if &found != sig {
			return Err(TTImportError::Signature {
				offset: offset,
				found: String::from_utf8_lossy(&found).into_owned(),
			});
		}

		Ok(())
	}
}
