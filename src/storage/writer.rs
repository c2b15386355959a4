use crate::core::error::Result;
use crate::tuple::tuple::Tuple;

/// Sink that persists tuples for one table.
///
/// Callers drive it as `open`, zero or more `insert`, `close`. Prefer
/// [`WriterSession`] which guarantees the close.
pub trait DataWriter {
    fn open(&mut self) -> Result<()>;
    fn insert(&mut self, tuple: &Tuple) -> Result<()>;
    fn close(&mut self) -> Result<()>;
}

impl<W: DataWriter + ?Sized> DataWriter for Box<W> {
    fn open(&mut self) -> Result<()> {
        (**self).open()
    }

    fn insert(&mut self, tuple: &Tuple) -> Result<()> {
        (**self).insert(tuple)
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}

/// Scoped open/close around a [`DataWriter`].
///
/// Dropping an unfinished session still closes the writer; a close error
/// at that point is logged, since the caller is already handling another.
pub struct WriterSession<'a, W: DataWriter + ?Sized> {
    writer: &'a mut W,
    open: bool,
    inserted: usize,
}

impl<'a, W: DataWriter + ?Sized> WriterSession<'a, W> {
    pub fn begin(writer: &'a mut W) -> Result<Self> {
        writer.open()?;
        Ok(WriterSession {
            writer,
            open: true,
            inserted: 0,
        })
    }

    pub fn insert(&mut self, tuple: &Tuple) -> Result<()> {
        self.writer.insert(tuple)?;
        self.inserted += 1;
        Ok(())
    }

    pub fn inserted(&self) -> usize {
        self.inserted
    }

    /// Close the writer, surfacing any close error
    pub fn finish(mut self) -> Result<usize> {
        self.open = false;
        self.writer.close()?;
        Ok(self.inserted)
    }
}

impl<W: DataWriter + ?Sized> Drop for WriterSession<'_, W> {
    fn drop(&mut self) {
        if self.open {
            if let Err(e) = self.writer.close() {
                tracing::warn!(error = %e, inserted = self.inserted, "failed to close writer after aborted session");
            }
        }
    }
}
