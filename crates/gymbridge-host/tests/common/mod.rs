//! Shared harness for boundary tests.
//!
//! Instantiates a shim guest with one exported trampoline per host
//! import plus a linear memory. Each trampoline calls the import from
//! inside wasm, so the host function runs with a real guest frame and
//! can resolve the exported memory through its `Caller`. Tests write
//! wire bytes into the memory, invoke a trampoline, and read the
//! out-record back.

#![allow(dead_code)]

use std::io::Write;
use std::sync::{Arc, Mutex};

use wasmtime::{Engine, Instance, Linker, Memory, Module, Store};

use gymbridge_host::{HostState, codec, host};

/// Guest module forwarding every capability call through a wasm frame.
pub const SHIM: &str = r#"
(module
  (import "gymnasium" "frozen_lake_make" (func $fl_make (param i32 i32 i32 i32 i32 i32 i32)))
  (import "gymnasium" "frozen_lake_reset" (func $fl_reset (param i32 i32 i64 i32)))
  (import "gymnasium" "frozen_lake_step" (func $fl_step (param i32 i32 i32)))
  (import "gymnasium" "lunar_lander_make" (func $ll_make (param i32 i32 i32)))
  (import "gymnasium" "lunar_lander_reset" (func $ll_reset (param i32 i32 i64 i32)))
  (import "gymnasium" "lunar_lander_step" (func $ll_step (param i32 i32 i32)))
  (import "gymnasium" "discrete_sample" (func $sample (param i32) (result i32)))
  (import "console" "print" (func $print (param i32 i32)))
  (memory (export "memory") 1)
  (func (export "frozen_lake_make") (param i32 i32 i32 i32 i32 i32 i32)
    (call $fl_make (local.get 0) (local.get 1) (local.get 2) (local.get 3)
                   (local.get 4) (local.get 5) (local.get 6)))
  (func (export "frozen_lake_reset") (param i32 i32 i64 i32)
    (call $fl_reset (local.get 0) (local.get 1) (local.get 2) (local.get 3)))
  (func (export "frozen_lake_step") (param i32 i32 i32)
    (call $fl_step (local.get 0) (local.get 1) (local.get 2)))
  (func (export "lunar_lander_make") (param i32 i32 i32)
    (call $ll_make (local.get 0) (local.get 1) (local.get 2)))
  (func (export "lunar_lander_reset") (param i32 i32 i64 i32)
    (call $ll_reset (local.get 0) (local.get 1) (local.get 2) (local.get 3)))
  (func (export "lunar_lander_step") (param i32 i32 i32)
    (call $ll_step (local.get 0) (local.get 1) (local.get 2)))
  (func (export "discrete_sample") (param i32) (result i32)
    (call $sample (local.get 0)))
  (func (export "print") (param i32 i32)
    (call $print (local.get 0) (local.get 1)))
)
"#;

/// Scratch addresses inside the shim's memory.
pub const RENDER_PTR: u32 = 0x100;
pub const MAP_PTR: u32 = 0x400;
pub const TEXT_PTR: u32 = 0x600;
pub const OUT_PTR: u32 = 0x800;

/// Cloneable in-memory sink for guest diagnostic output.
#[derive(Clone, Default)]
pub struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// The `*_make` out-record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MakeRecord {
    pub env: u32,
    pub action_space: u32,
    pub action_n: u32,
    pub obs_space: u32,
    pub obs_n: u32,
}

/// The `frozen_lake_step` out-record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridStepRecord {
    pub observation: u32,
    pub done: bool,
    pub reward: f64,
    pub prob: f64,
}

pub struct Guest {
    store: Store<HostState>,
    instance: Instance,
    memory: Memory,
}

impl Guest {
    pub fn new() -> Self {
        Self::with_state(HostState::new())
    }

    pub fn with_state(state: HostState) -> Self {
        let engine = Engine::default();
        let module = Module::new(&engine, SHIM).unwrap();
        let mut linker = Linker::new(&engine);
        host::add_to_linker(&mut linker).unwrap();
        let mut store = Store::new(&engine, state);
        let instance = linker.instantiate(&mut store, &module).unwrap();
        let memory = instance.get_memory(&mut store, "memory").unwrap();
        Self {
            store,
            instance,
            memory,
        }
    }

    pub fn state(&self) -> &HostState {
        self.store.data()
    }

    fn write_mem(&mut self, ptr: u32, bytes: &[u8]) {
        self.memory
            .write(&mut self.store, ptr as usize, bytes)
            .unwrap();
    }

    fn read_mem(&self, ptr: u32, len: usize) -> Vec<u8> {
        let mut buf = vec![0u8; len];
        self.memory
            .read(&self.store, ptr as usize, &mut buf)
            .unwrap();
        buf
    }

    fn read_u32(&self, ptr: u32) -> u32 {
        u32::from_le_bytes(self.read_mem(ptr, 4).try_into().unwrap())
    }

    fn read_f64(&self, ptr: u32) -> f64 {
        f64::from_le_bytes(self.read_mem(ptr, 8).try_into().unwrap())
    }

    fn read_make_record(&self) -> MakeRecord {
        MakeRecord {
            env: self.read_u32(OUT_PTR),
            action_space: self.read_u32(OUT_PTR + 4),
            action_n: self.read_u32(OUT_PTR + 8),
            obs_space: self.read_u32(OUT_PTR + 12),
            obs_n: self.read_u32(OUT_PTR + 16),
        }
    }

    pub fn frozen_lake_make(
        &mut self,
        render: &str,
        slippery: bool,
        layout: Option<&[&str]>,
    ) -> wasmtime::Result<MakeRecord> {
        let render_bytes = codec::encode_text(render);
        self.write_mem(RENDER_PTR, &render_bytes);
        let (has_map, map_len) = match layout {
            None => (0, 0),
            Some(rows) => {
                let bytes = codec::encode_rows(rows);
                self.write_mem(MAP_PTR, &bytes);
                (1, u32::try_from(bytes.len()).unwrap())
            }
        };
        let make = self
            .instance
            .get_typed_func::<(u32, u32, u32, u32, u32, u32, u32), ()>(
                &mut self.store,
                "frozen_lake_make",
            )?;
        make.call(
            &mut self.store,
            (
                RENDER_PTR,
                u32::try_from(render_bytes.len()).unwrap(),
                u32::from(slippery),
                has_map,
                MAP_PTR,
                map_len,
                OUT_PTR,
            ),
        )?;
        Ok(self.read_make_record())
    }

    pub fn frozen_lake_reset(
        &mut self,
        env: u32,
        seed: Option<u64>,
    ) -> wasmtime::Result<(u32, f64)> {
        let reset = self
            .instance
            .get_typed_func::<(u32, u32, u64, u32), ()>(&mut self.store, "frozen_lake_reset")?;
        reset.call(
            &mut self.store,
            (env, u32::from(seed.is_some()), seed.unwrap_or(0), OUT_PTR),
        )?;
        Ok((self.read_u32(OUT_PTR), self.read_f64(OUT_PTR + 8)))
    }

    pub fn frozen_lake_step(&mut self, env: u32, action: u32) -> wasmtime::Result<GridStepRecord> {
        let step = self
            .instance
            .get_typed_func::<(u32, u32, u32), ()>(&mut self.store, "frozen_lake_step")?;
        step.call(&mut self.store, (env, action, OUT_PTR))?;
        Ok(GridStepRecord {
            observation: self.read_u32(OUT_PTR),
            done: self.read_u32(OUT_PTR + 4) != 0,
            reward: self.read_f64(OUT_PTR + 8),
            prob: self.read_f64(OUT_PTR + 16),
        })
    }

    pub fn lunar_lander_make(&mut self, render: &str) -> wasmtime::Result<MakeRecord> {
        let render_bytes = codec::encode_text(render);
        self.write_mem(RENDER_PTR, &render_bytes);
        let make = self
            .instance
            .get_typed_func::<(u32, u32, u32), ()>(&mut self.store, "lunar_lander_make")?;
        make.call(
            &mut self.store,
            (RENDER_PTR, u32::try_from(render_bytes.len()).unwrap(), OUT_PTR),
        )?;
        Ok(self.read_make_record())
    }

    pub fn lunar_lander_reset(
        &mut self,
        env: u32,
        seed: Option<u64>,
    ) -> wasmtime::Result<[f64; 8]> {
        let reset = self
            .instance
            .get_typed_func::<(u32, u32, u64, u32), ()>(&mut self.store, "lunar_lander_reset")?;
        reset.call(
            &mut self.store,
            (env, u32::from(seed.is_some()), seed.unwrap_or(0), OUT_PTR),
        )?;
        Ok(self.read_vector(OUT_PTR))
    }

    pub fn lunar_lander_step(
        &mut self,
        env: u32,
        action: u32,
    ) -> wasmtime::Result<([f64; 8], f64, bool)> {
        let step = self
            .instance
            .get_typed_func::<(u32, u32, u32), ()>(&mut self.store, "lunar_lander_step")?;
        step.call(&mut self.store, (env, action, OUT_PTR))?;
        Ok((
            self.read_vector(OUT_PTR),
            self.read_f64(OUT_PTR + 64),
            self.read_u32(OUT_PTR + 72) != 0,
        ))
    }

    pub fn discrete_sample(&mut self, space: u32) -> wasmtime::Result<u32> {
        let sample = self
            .instance
            .get_typed_func::<u32, u32>(&mut self.store, "discrete_sample")?;
        sample.call(&mut self.store, space)
    }

    pub fn print(&mut self, text: &str) -> wasmtime::Result<()> {
        self.print_raw(&codec::encode_text(text))
    }

    pub fn print_raw(&mut self, bytes: &[u8]) -> wasmtime::Result<()> {
        self.write_mem(TEXT_PTR, bytes);
        let print = self
            .instance
            .get_typed_func::<(u32, u32), ()>(&mut self.store, "print")?;
        print.call(
            &mut self.store,
            (TEXT_PTR, u32::try_from(bytes.len()).unwrap()),
        )
    }

    fn read_vector(&self, ptr: u32) -> [f64; 8] {
        let mut values = [0.0; 8];
        for (i, value) in values.iter_mut().enumerate() {
            *value = self.read_f64(ptr + u32::try_from(i * 8).unwrap());
        }
        values
    }
}
