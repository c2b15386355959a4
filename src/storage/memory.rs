use std::sync::Arc;
use parking_lot::RwLock;
use crate::core::error::{Error, Result};
use crate::storage::writer::DataWriter;
use crate::tuple::tuple::Tuple;

/// In-memory table. Clones share the same rows.
#[derive(Debug, Clone, Default)]
pub struct MemoryWriter {
    rows: Arc<RwLock<Vec<Tuple>>>,
    open: bool,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> Vec<Tuple> {
        self.rows.read().clone()
    }

    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }
}

impl DataWriter for MemoryWriter {
    fn open(&mut self) -> Result<()> {
        if self.open {
            return Err(Error::storage("memory writer already open"));
        }
        self.open = true;
        Ok(())
    }

    fn insert(&mut self, tuple: &Tuple) -> Result<()> {
        if !self.open {
            return Err(Error::storage("memory writer not open"));
        }
        self.rows.write().push(tuple.clone());
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.open = false;
        Ok(())
    }
}
