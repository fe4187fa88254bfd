// vecraster/scene/src/records.rs
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Fixed-layout records consumed by the rasterizer backend (spec.md §3,
//! binding table §6). Each record type has both a `#[repr(C)]` in-memory
//! form and a little-endian byte-buffer form (`write_le`/`read_le`), so a
//! real GPU upload call can serialize without relying on struct layout
//! matching across toolchains, per SPEC_FULL.md §5.5.

use byteorder::{ByteOrder, LittleEndian};

/// `0 = evenodd`, `1 = nonzero`, per spec.md §3.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FillRule {
    EvenOdd = 0,
    NonZero = 1,
}

impl FillRule {
    #[inline]
    pub fn to_u32(self) -> u32 {
        self as u32
    }

    #[inline]
    pub fn from_u32(v: u32) -> FillRule {
        if v == 1 {
            FillRule::NonZero
        } else {
            FillRule::EvenOdd
        }
    }
}

/// 64 bytes, 4-byte aligned. See spec.md §3.
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(C)]
pub struct ShapeRecord {
    pub v_start: u32,
    pub v_count: u32,
    pub rule: u32,
    pub _pad0: u32,
    pub color: [f32; 4],
    pub clip_start: u32,
    pub clip_count: u32,
    pub mask_start: u32,
    pub mask_count: u32,
    pub opacity: f32,
    pub _pad1: [f32; 3],
}

pub const SHAPE_RECORD_SIZE: usize = 64;

impl ShapeRecord {
    pub fn write_le(&self, out: &mut [u8]) {
        debug_assert_eq!(out.len(), SHAPE_RECORD_SIZE);
        LittleEndian::write_u32(&mut out[0..4], self.v_start);
        LittleEndian::write_u32(&mut out[4..8], self.v_count);
        LittleEndian::write_u32(&mut out[8..12], self.rule);
        LittleEndian::write_u32(&mut out[12..16], 0);
        LittleEndian::write_f32(&mut out[16..20], self.color[0]);
        LittleEndian::write_f32(&mut out[20..24], self.color[1]);
        LittleEndian::write_f32(&mut out[24..28], self.color[2]);
        LittleEndian::write_f32(&mut out[28..32], self.color[3]);
        LittleEndian::write_u32(&mut out[32..36], self.clip_start);
        LittleEndian::write_u32(&mut out[36..40], self.clip_count);
        LittleEndian::write_u32(&mut out[40..44], self.mask_start);
        LittleEndian::write_u32(&mut out[44..48], self.mask_count);
        LittleEndian::write_f32(&mut out[48..52], self.opacity);
        LittleEndian::write_f32(&mut out[52..56], 0.0);
        LittleEndian::write_f32(&mut out[56..60], 0.0);
        LittleEndian::write_f32(&mut out[60..64], 0.0);
    }

    pub fn read_le(bytes: &[u8]) -> ShapeRecord {
        debug_assert_eq!(bytes.len(), SHAPE_RECORD_SIZE);
        ShapeRecord {
            v_start: LittleEndian::read_u32(&bytes[0..4]),
            v_count: LittleEndian::read_u32(&bytes[4..8]),
            rule: LittleEndian::read_u32(&bytes[8..12]),
            _pad0: 0,
            color: [
                LittleEndian::read_f32(&bytes[16..20]),
                LittleEndian::read_f32(&bytes[20..24]),
                LittleEndian::read_f32(&bytes[24..28]),
                LittleEndian::read_f32(&bytes[28..32]),
            ],
            clip_start: LittleEndian::read_u32(&bytes[32..36]),
            clip_count: LittleEndian::read_u32(&bytes[36..40]),
            mask_start: LittleEndian::read_u32(&bytes[40..44]),
            mask_count: LittleEndian::read_u32(&bytes[44..48]),
            opacity: LittleEndian::read_f32(&bytes[48..52]),
            _pad1: [0.0; 3],
        }
    }
}

/// 16 bytes.
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(C)]
pub struct ClipRecord {
    pub v_start: u32,
    pub v_count: u32,
    pub rule: u32,
    pub _pad: u32,
}

pub const CLIP_RECORD_SIZE: usize = 16;

impl ClipRecord {
    pub fn write_le(&self, out: &mut [u8]) {
        debug_assert_eq!(out.len(), CLIP_RECORD_SIZE);
        LittleEndian::write_u32(&mut out[0..4], self.v_start);
        LittleEndian::write_u32(&mut out[4..8], self.v_count);
        LittleEndian::write_u32(&mut out[8..12], self.rule);
        LittleEndian::write_u32(&mut out[12..16], 0);
    }

    pub fn read_le(bytes: &[u8]) -> ClipRecord {
        debug_assert_eq!(bytes.len(), CLIP_RECORD_SIZE);
        ClipRecord {
            v_start: LittleEndian::read_u32(&bytes[0..4]),
            v_count: LittleEndian::read_u32(&bytes[4..8]),
            rule: LittleEndian::read_u32(&bytes[8..12]),
            _pad: 0,
        }
    }
}

/// 32 bytes.
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(C)]
pub struct MaskRecord {
    pub v_start: u32,
    pub v_count: u32,
    pub rule: u32,
    pub _pad0: u32,
    pub alpha: f32,
    pub _pad1: [f32; 3],
}

pub const MASK_RECORD_SIZE: usize = 32;

impl MaskRecord {
    pub fn write_le(&self, out: &mut [u8]) {
        debug_assert_eq!(out.len(), MASK_RECORD_SIZE);
        LittleEndian::write_u32(&mut out[0..4], self.v_start);
        LittleEndian::write_u32(&mut out[4..8], self.v_count);
        LittleEndian::write_u32(&mut out[8..12], self.rule);
        LittleEndian::write_u32(&mut out[12..16], 0);
        LittleEndian::write_f32(&mut out[16..20], self.alpha);
        LittleEndian::write_f32(&mut out[20..24], 0.0);
        LittleEndian::write_f32(&mut out[24..28], 0.0);
        LittleEndian::write_f32(&mut out[28..32], 0.0);
    }

    pub fn read_le(bytes: &[u8]) -> MaskRecord {
        debug_assert_eq!(bytes.len(), MASK_RECORD_SIZE);
        MaskRecord {
            v_start: LittleEndian::read_u32(&bytes[0..4]),
            v_count: LittleEndian::read_u32(&bytes[4..8]),
            rule: LittleEndian::read_u32(&bytes[8..12]),
            _pad0: 0,
            alpha: LittleEndian::read_f32(&bytes[16..20]),
            _pad1: [0.0; 3],
        }
    }
}

/// 32 bytes.
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(C)]
pub struct Uniforms {
    pub canvas_w: u32,
    pub canvas_h: u32,
    pub tile_size: u32,
    pub tiles_x: u32,
    pub supersample: u32,
    pub _pad: [u32; 3],
}

pub const UNIFORMS_SIZE: usize = 32;

impl Uniforms {
    pub fn write_le(&self, out: &mut [u8]) {
        debug_assert_eq!(out.len(), UNIFORMS_SIZE);
        LittleEndian::write_u32(&mut out[0..4], self.canvas_w);
        LittleEndian::write_u32(&mut out[4..8], self.canvas_h);
        LittleEndian::write_u32(&mut out[8..12], self.tile_size);
        LittleEndian::write_u32(&mut out[12..16], self.tiles_x);
        LittleEndian::write_u32(&mut out[16..20], self.supersample);
        LittleEndian::write_u32(&mut out[20..24], 0);
        LittleEndian::write_u32(&mut out[24..28], 0);
        LittleEndian::write_u32(&mut out[28..32], 0);
    }
}
