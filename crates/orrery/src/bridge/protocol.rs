//! Flat f32 buffer shared with the renderer.
//! Must stay in sync with the TypeScript reader.
//!
//! Layout (all values in f32 / 4 bytes):
//! ```text
//! [Header: 8 floats]
//! [Bodies: max_bodies × 4 floats]       x, y, z (AU), anomaly (rad)
//! [Grid: grid_resolution² floats]       potential samples, row-major
//! ```
//!
//! Capacities are written into the header once; counts are rewritten every frame.

use bytemuck::{Pod, Zeroable};

use crate::api::config::OrreryConfig;
use crate::core::constants::LengthUnit;
use crate::core::system::OrbitalSystem;
use crate::core::time::SimClock;
use crate::field::potential::PotentialGrid;

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 8;

/// Header field indices.
pub const HEADER_PROTOCOL_VERSION: usize = 0;
pub const HEADER_MAX_BODIES: usize = 1;
pub const HEADER_BODY_COUNT: usize = 2;
pub const HEADER_ELAPSED_DAYS: usize = 3;
pub const HEADER_GRID_RESOLUTION: usize = 4;
pub const HEADER_GRID_MIN: usize = 5;
pub const HEADER_GRID_MAX: usize = 6;
pub const HEADER_FRAME_COUNTER: usize = 7;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// One body's entry in the buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct BodySample {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub theta: f32,
}

impl BodySample {
    pub const FLOATS: usize = 4;
}

/// Runtime-computed buffer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionLayout {
    pub max_bodies: usize,
    pub grid_resolution: usize,

    pub body_data_floats: usize,
    pub grid_data_floats: usize,

    pub body_data_offset: usize,
    pub grid_data_offset: usize,

    pub buffer_total_floats: usize,
    pub buffer_total_bytes: usize,
}

impl PositionLayout {
    pub fn new(max_bodies: usize, grid_resolution: usize) -> Self {
        let body_data_floats = max_bodies * BodySample::FLOATS;
        let grid_data_floats = grid_resolution * grid_resolution;

        let body_data_offset = HEADER_FLOATS;
        let grid_data_offset = body_data_offset + body_data_floats;

        let buffer_total_floats = grid_data_offset + grid_data_floats;

        Self {
            max_bodies,
            grid_resolution,
            body_data_floats,
            grid_data_floats,
            body_data_offset,
            grid_data_offset,
            buffer_total_floats,
            buffer_total_bytes: buffer_total_floats * 4,
        }
    }

    pub fn from_config(config: &OrreryConfig) -> Self {
        Self::new(config.max_bodies, config.grid_resolution.max(1))
    }
}

/// Owned buffer laid out per [`PositionLayout`].
#[derive(Debug, Clone)]
pub struct PositionBuffer {
    layout: PositionLayout,
    data: Vec<f32>,
    frame: u32,
}

impl PositionBuffer {
    pub fn new(layout: PositionLayout) -> Self {
        let mut data = vec![0.0; layout.buffer_total_floats];
        data[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        data[HEADER_MAX_BODIES] = layout.max_bodies as f32;
        data[HEADER_GRID_RESOLUTION] = layout.grid_resolution as f32;
        Self { layout, data, frame: 0 }
    }

    /// Write body samples (AU) and the clock. Bodies past `max_bodies` are dropped.
    pub fn write_bodies(&mut self, system: &OrbitalSystem, clock: &SimClock) {
        let scale = LengthUnit::AstronomicalUnits.per_meter();
        let count = system.len().min(self.layout.max_bodies);
        let start = self.layout.body_data_offset;
        let end = start + count * BodySample::FLOATS;
        let samples: &mut [BodySample] = bytemuck::cast_slice_mut(&mut self.data[start..end]);

        for (slot, (_, theta, pos)) in samples.iter_mut().zip(system.iter()) {
            let p = pos * scale;
            *slot = BodySample {
                x: p.x as f32,
                y: p.y as f32,
                z: p.z as f32,
                theta: theta as f32,
            };
        }

        self.frame = self.frame.wrapping_add(1);
        self.data[HEADER_BODY_COUNT] = count as f32;
        self.data[HEADER_ELAPSED_DAYS] = clock.days() as f32;
        self.data[HEADER_FRAME_COUNTER] = self.frame as f32;
    }

    /// Copy grid samples and their range. The grid must match the layout resolution.
    pub fn write_grid(&mut self, grid: &PotentialGrid) {
        let start = self.layout.grid_data_offset;
        let n = self.layout.grid_data_floats.min(grid.values().len());
        for (dst, src) in self.data[start..start + n].iter_mut().zip(grid.values()) {
            *dst = *src as f32;
        }
        let (lo, hi) = grid.range();
        self.data[HEADER_GRID_MIN] = lo as f32;
        self.data[HEADER_GRID_MAX] = hi as f32;
    }

    pub fn body(&self, index: usize) -> Option<BodySample> {
        if index >= self.body_count() {
            return None;
        }
        let start = self.layout.body_data_offset + index * BodySample::FLOATS;
        let samples: &[BodySample] =
            bytemuck::cast_slice(&self.data[start..start + BodySample::FLOATS]);
        Some(samples[0])
    }

    pub fn body_count(&self) -> usize {
        self.data[HEADER_BODY_COUNT] as usize
    }

    pub fn layout(&self) -> &PositionLayout {
        &self.layout
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn as_ptr(&self) -> *const f32 {
        self.data.as_ptr()
    }

    pub fn grid_ptr(&self) -> *const f32 {
        self.data[self.layout.grid_data_offset..].as_ptr()
    }
}
