use std::io::{
	Read,
	Result
};

pub trait ReadBinExt: Read {
	/// Reads a null-terminated string
	#[inline]
	fn read_cstr(&mut self) -> Result<String> {
		let mut s = String::new();
		let mut buf = [1; 1];

		while buf[0] != 0 {
			self.read_exact(&mut buf)?;
			if buf[0] != 0 {
				s.push(buf[0] as char);
			}
		}

		Ok(s)
	}

	/// Reads two consecutive null-terminated strings and returns the first.
	/// Both strings are always consumed.
	#[inline]
	fn read_cstr_pair(&mut self) -> Result<String> {
		let s = self.read_cstr()?;
		self.read_cstr()?;

		Ok(s)
	}

	/// Reads a fixed-length tag
	#[inline]
	fn read_tag<const N: usize>(&mut self) -> Result<[u8; N]> {
		let mut tag = [0; N];
		self.read_exact(&mut tag)?;

		Ok(tag)
	}
}

impl<R> ReadBinExt for R
where
	R: Read + ?Sized,
{
}

#[cfg(test)]
mod tests {
	use std::io::ErrorKind;

	use super::*;

	#[test]
	fn test_read_cstr() {
		let mut data = &b"test\x00123454321"[..];
		assert_eq!("test".to_string(), data.read_cstr().unwrap());
		assert_eq!(data, b"123454321");
	}

	#[test]
	fn test_read_cstr_unterminated() {
		let mut data = &b"test"[..];
		let err = data.read_cstr().unwrap_err();
		assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
	}

	#[test]
	fn test_read_cstr_pair() {
		let mut data = &b"mat.tex\x00MAT.TEX\x00\x01"[..];
		assert_eq!("mat.tex".to_string(), data.read_cstr_pair().unwrap());
		assert_eq!(data, b"\x01");

		let mut empty = &b"\x00\x00rest"[..];
		assert_eq!("".to_string(), empty.read_cstr_pair().unwrap());
		assert_eq!(empty, b"rest");
	}

	#[test]
	fn test_read_tag() {
		let mut data = &b"DXTV\x00\x00\x00\x01"[..];
		assert_eq!(*b"DXTV", data.read_tag::<4>().unwrap());
		assert_eq!(data.len(), 4);
	}
}
