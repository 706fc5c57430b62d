//! Precompiled text draw commands
//!
//! Every glyph and every palette colour is turned into a command once, when
//! the renderer is created, and registered with the backend under a
//! [`CommandId`]. Drawing a string then only means sending a list of ids.
//!
//! Id layout: glyph `n` is id `n` (0-255), palette entry `p` is id `256 + p`
//! (256-287). Shadow colours are the palette entries 16-31.

use super::font_atlas::{FontError, FontResult, GlyphMetrics, GlyphQuad, GLYPH_COUNT};
use super::palette::{ColorPalette, PALETTE_SIZE};
use crate::foundation::math::Vec3;
use crate::render::backend::TextRenderBackend;

/// Maximum number of ids sent to the backend in one call
pub const BATCH_CAPACITY: usize = 1024;

/// Total number of precompiled commands
pub const COMMAND_COUNT: usize = GLYPH_COUNT + PALETTE_SIZE;

/// Identifier of a precompiled command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandId(pub u32);

impl CommandId {
    /// Command drawing an atlas glyph
    pub const fn glyph(glyph: u8) -> Self {
        Self(glyph as u32)
    }

    /// Command selecting a palette entry
    pub const fn color(entry: usize) -> Self {
        Self((GLYPH_COUNT + entry) as u32)
    }

    /// Position in the command table
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A command the backend compiles once and replays by id
#[derive(Debug, Clone, PartialEq)]
pub enum PrecompiledCommand {
    /// Draw a glyph quad at the pen, then move the pen right by `advance`
    Glyph {
        /// Quad geometry and atlas UVs
        quad: GlyphQuad,
        /// Pen advance in pixels
        advance: i32,
    },
    /// Replace the current draw colour; alpha becomes opaque
    Color {
        /// Normalized RGB
        rgb: Vec3,
    },
}

/// All precompiled commands, indexed by [`CommandId`]
#[derive(Debug, Clone)]
pub struct CommandTable {
    commands: Vec<PrecompiledCommand>,
}

impl CommandTable {
    /// Build glyph commands from the metrics and colour commands from the palette
    pub fn build(metrics: &GlyphMetrics, palette: &ColorPalette) -> Self {
        let glyphs = (0..=u8::MAX).map(|glyph| PrecompiledCommand::Glyph {
            quad: GlyphQuad::for_glyph(glyph),
            advance: metrics.advance(glyph),
        });
        let colors = (0..PALETTE_SIZE).map(|entry| PrecompiledCommand::Color {
            rgb: palette.normalized(entry),
        });

        Self {
            commands: glyphs.chain(colors).collect(),
        }
    }

    /// Hand every command to the backend under its id
    pub fn register<B: TextRenderBackend + ?Sized>(&self, backend: &mut B) -> FontResult<()> {
        for (index, command) in self.commands.iter().enumerate() {
            backend
                .define_command(CommandId(index as u32), command)
                .map_err(|e| FontError::Backend(e.to_string()))?;
        }
        log::info!("Registered {} precompiled text commands", self.commands.len());
        Ok(())
    }

    /// Look up a command
    pub fn get(&self, id: CommandId) -> Option<&PrecompiledCommand> {
        self.commands.get(id.index())
    }

    /// Number of commands
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Bounded buffer of pending command ids
///
/// Ids are pushed while a string is scanned. The buffer is handed to a sink
/// as soon as it is full and once more when the scan ends.
#[derive(Debug, Clone)]
pub struct CommandBatch {
    pending: Vec<CommandId>,
    capacity: usize,
}

impl CommandBatch {
    /// Create a batch holding [`BATCH_CAPACITY`] ids
    pub fn new() -> Self {
        Self::with_capacity(BATCH_CAPACITY)
    }

    /// Create a batch with a custom capacity (at least 1)
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            pending: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an id, flushing to `sink` if the batch becomes full
    pub fn push<E, F>(&mut self, id: CommandId, sink: &mut F) -> Result<(), E>
    where
        F: FnMut(&[CommandId]) -> Result<(), E>,
    {
        self.pending.push(id);
        if self.pending.len() >= self.capacity {
            self.flush(sink)?;
        }
        Ok(())
    }

    /// Send pending ids to `sink` and clear the batch; no-op when empty
    pub fn flush<E, F>(&mut self, sink: &mut F) -> Result<(), E>
    where
        F: FnMut(&[CommandId]) -> Result<(), E>,
    {
        if self.pending.is_empty() {
            return Ok(());
        }
        log::trace!("Flushing {} text commands", self.pending.len());
        let result = sink(&self.pending);
        self.pending.clear();
        result
    }

    /// Drop pending ids without sending them
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Ids waiting to be flushed
    pub fn pending(&self) -> &[CommandId] {
        &self.pending
    }

    /// Maximum ids held before a flush
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for CommandBatch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::backend::RecordingBackend;
    use std::convert::Infallible;

    #[test]
    fn test_id_layout() {
        assert_eq!(CommandId::glyph(0), CommandId(0));
        assert_eq!(CommandId::glyph(255), CommandId(255));
        assert_eq!(CommandId::color(0), CommandId(256));
        assert_eq!(CommandId::color(31), CommandId(287));
    }

    #[test]
    fn test_table_contents() {
        let mut advances = [2; GLYPH_COUNT];
        advances[65] = 8;
        let table = CommandTable::build(&GlyphMetrics::from_advances(advances), &ColorPalette::build());
        assert_eq!(table.len(), COMMAND_COUNT);

        match table.get(CommandId::glyph(65)) {
            Some(PrecompiledCommand::Glyph { quad, advance }) => {
                assert_eq!(*advance, 8);
                assert_eq!(*quad, GlyphQuad::for_glyph(65));
            }
            other => panic!("expected glyph command, got {:?}", other),
        }
        match table.get(CommandId::color(15)) {
            Some(PrecompiledCommand::Color { rgb }) => assert_eq!(*rgb, Vec3::new(1.0, 1.0, 1.0)),
            other => panic!("expected colour command, got {:?}", other),
        }
        assert!(table.get(CommandId(COMMAND_COUNT as u32)).is_none());
    }

    #[test]
    fn test_register_defines_every_command() {
        let table = CommandTable::build(&GlyphMetrics::from_advances([2; GLYPH_COUNT]), &ColorPalette::build());
        let mut backend = RecordingBackend::new();
        table.register(&mut backend).unwrap();

        assert_eq!(backend.defined_commands(), COMMAND_COUNT);
    }

    #[test]
    fn test_overflow_flushes_full_batches() {
        let mut batch = CommandBatch::new();
        let mut flushed: Vec<usize> = Vec::new();
        let mut sink = |ids: &[CommandId]| -> Result<(), Infallible> {
            flushed.push(ids.len());
            Ok(())
        };

        for _ in 0..1025 {
            batch.push(CommandId::glyph(b'a'), &mut sink).unwrap();
        }
        batch.flush(&mut sink).unwrap();

        assert_eq!(flushed, vec![1024, 1]);
    }

    #[test]
    fn test_exact_capacity_flushes_once() {
        let mut batch = CommandBatch::with_capacity(4);
        let mut calls = 0;
        let mut sink = |_: &[CommandId]| -> Result<(), Infallible> {
            calls += 1;
            Ok(())
        };

        for glyph in 0..4 {
            batch.push(CommandId::glyph(glyph), &mut sink).unwrap();
        }
        batch.flush(&mut sink).unwrap();

        assert_eq!(calls, 1);
        assert!(batch.pending().is_empty());
    }

    #[test]
    fn test_failed_flush_still_clears() {
        let mut batch = CommandBatch::with_capacity(2);
        let mut sink = |_: &[CommandId]| -> Result<(), &'static str> { Err("backend lost") };

        batch.push(CommandId::glyph(1), &mut sink).unwrap();
        assert_eq!(batch.push(CommandId::glyph(2), &mut sink), Err("backend lost"));
        assert!(batch.pending().is_empty());
    }
}
