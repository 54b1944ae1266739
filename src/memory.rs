use crate::r#ref::HostInfo;
use crate::store::StoreRef;
use crate::types::MemoryType;
use crate::{DeepCopy, Own, Store};

/// The size of a linear-memory page in bytes.
pub const PAGE_SIZE: usize = 0x10000;

/// A linear memory.
#[derive(Debug)]
pub struct Memory {
    store: StoreRef,
    memory: wasmtime::Memory,
    host_info: HostInfo,
}

declare_ref!(Memory);

impl Memory {
    pub fn make(store: &Store, ty: &MemoryType) -> Own<Memory> {
        let store = store.store.clone();
        let memory = ty
            .to_wasmtime()
            .and_then(|ty| wasmtime::Memory::new(&mut *store.context(), ty));
        crate::handle_result(memory, "creating a memory", |memory| {
            Memory::from_wasmtime(memory, store)
        })
        .map_or_else(Own::empty, Own::new)
    }

    pub fn type_(&self) -> Own<MemoryType> {
        Own::new(self.ty())
    }

    /// The start of the memory's contents.
    ///
    /// The pointer is valid for [`Memory::data_size`] bytes until the memory
    /// grows or the store executes wasm code.
    pub fn data(&self) -> *mut u8 {
        self.memory.data_ptr(&*self.store.context())
    }

    /// The current size in bytes.
    pub fn data_size(&self) -> usize {
        self.memory.data_size(&*self.store.context())
    }

    /// The current size in pages.
    pub fn size(&self) -> u32 {
        let pages = self.memory.size(&*self.store.context());
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Adds `delta` zeroed pages, returning the previous size in pages.
    /// Growth is all or nothing: on failure the size is unchanged.
    pub fn grow(&self, delta: u32) -> Option<u32> {
        let result = self.memory.grow(&mut *self.store.context(), delta.into());
        crate::handle_result(result, "growing a memory", |prev| u32::try_from(prev).ok())?
    }

    /// Copies bytes starting at `offset` into `buf`. Fails, without copying
    /// anything, if the range is out of bounds.
    pub fn read(&self, offset: usize, buf: &mut [u8]) -> bool {
        self.memory
            .read(&*self.store.context(), offset, buf)
            .is_ok()
    }

    /// Copies `data` into memory starting at `offset`. Fails, without
    /// copying anything, if the range is out of bounds.
    pub fn write(&self, offset: usize, data: &[u8]) -> bool {
        self.memory
            .write(&mut *self.store.context(), offset, data)
            .is_ok()
    }

    pub(crate) fn ty(&self) -> MemoryType {
        MemoryType::from_wasmtime(&self.memory.ty(&*self.store.context()))
    }

    pub(crate) fn from_wasmtime(memory: wasmtime::Memory, store: StoreRef) -> Memory {
        Memory {
            store,
            memory,
            host_info: HostInfo::default(),
        }
    }

    pub(crate) fn wasmtime_in(&self, store: &StoreRef) -> Option<wasmtime::Memory> {
        self.store.same(store).then_some(self.memory)
    }
}

impl DeepCopy for Memory {
    fn copy(&self) -> Memory {
        Memory::from_wasmtime(self.memory, self.store.clone())
    }
}
