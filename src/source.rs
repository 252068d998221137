//! Where the decoder pulls its bytes from.

/// A strictly forward, single pass source of bytes.
///
/// The decoder always knows exactly how many bytes it wants next, so both
/// methods are "all or nothing": returning a count lower than requested
/// tells the decoder the data ran out (or the caller wants to cancel), and
/// the decode stops with [`TruncatedInput`](crate::PngError::TruncatedInput).
pub trait ByteSource {
  /// Fills all of `buf`, returning how many bytes were written.
  fn read(&mut self, buf: &mut [u8]) -> usize;

  /// Advances past `len` bytes without handing them out.
  ///
  /// The default reads into a small scratch buffer. Sources that can seek
  /// (flash, memory) should override this.
  fn skip(&mut self, len: usize) -> usize {
    let mut trash = [0_u8; 64];
    let mut done = 0;
    while done < len {
      let want = (len - done).min(trash.len());
      let got = self.read(&mut trash[..want]);
      done += got;
      if got < want {
        break;
      }
    }
    done
  }
}

impl<T: ByteSource + ?Sized> ByteSource for &mut T {
  #[inline]
  fn read(&mut self, buf: &mut [u8]) -> usize {
    (**self).read(buf)
  }
  #[inline]
  fn skip(&mut self, len: usize) -> usize {
    (**self).skip(len)
  }
}

/// Reading from a slice consumes bytes off the front of it.
impl ByteSource for &[u8] {
  #[inline]
  fn read(&mut self, buf: &mut [u8]) -> usize {
    let n = buf.len().min(self.len());
    let (head, tail) = self.split_at(n);
    buf[..n].copy_from_slice(head);
    *self = tail;
    n
  }
  #[inline]
  fn skip(&mut self, len: usize) -> usize {
    let n = len.min(self.len());
    *self = &self[n..];
    n
  }
}

/// Adapts a raw read callback.
///
/// The callback gets `(target, len)`. When `target` is `Some` it must copy
/// `len` bytes into it; when it's `None` it only has to advance past `len`
/// bytes. Either way it returns how many bytes it got through.
#[derive(Debug, Clone, Copy)]
pub struct ReadFn<F>(pub F);
impl<F> ByteSource for ReadFn<F>
where
  F: FnMut(Option<&mut [u8]>, usize) -> usize,
{
  #[inline]
  fn read(&mut self, buf: &mut [u8]) -> usize {
    let len = buf.len();
    (self.0)(Some(buf), len)
  }
  #[inline]
  fn skip(&mut self, len: usize) -> usize {
    (self.0)(None, len)
  }
}

/// Adapts any [`std::io::Read`].
///
/// An I/O error counts the same as running out of data.
#[cfg(feature = "std")]
#[cfg_attr(docs_rs, doc(cfg(feature = "std")))]
#[derive(Debug)]
pub struct IoSource<R>(pub R);
#[cfg(feature = "std")]
impl<R: std::io::Read> ByteSource for IoSource<R> {
  fn read(&mut self, buf: &mut [u8]) -> usize {
    let mut done = 0;
    while done < buf.len() {
      match self.0.read(&mut buf[done..]) {
        Ok(0) => break,
        Ok(n) => done += n,
        Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
        Err(e) => {
          log::debug!("png: read failed: {e}");
          break;
        }
      }
    }
    done
  }
  fn skip(&mut self, len: usize) -> usize {
    use std::io::Read;
    std::io::copy(&mut (&mut self.0).take(len as u64), &mut std::io::sink())
      .map(|n| n as usize)
      .unwrap_or(0)
  }
}
