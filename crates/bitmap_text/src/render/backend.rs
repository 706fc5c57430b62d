//! Text Render Backend Trait
//!
//! Defines the interface between the text renderer and a graphics backend.
//! Keeps text layout and batching independent of any particular graphics API.

use std::collections::HashMap;
use std::error::Error;

use crate::assets::ImageData;
use crate::foundation::math::Vec4;
use crate::render::text::{CommandId, PrecompiledCommand};

/// Handle to a texture owned by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

/// Backend-agnostic text rendering interface
///
/// Commands are defined once with [`define_command`](Self::define_command)
/// and later replayed in batches with [`call_commands`](Self::call_commands).
/// A glyph command draws at the current transform origin and then moves the
/// origin right by its advance; a colour command replaces the draw colour
/// with an opaque one.
pub trait TextRenderBackend {
    /// Upload the font bitmap as a texture
    fn upload_texture(&mut self, image: &ImageData) -> Result<TextureHandle, Box<dyn Error>>;

    /// Compile a command under the given id
    fn define_command(&mut self, id: CommandId, command: &PrecompiledCommand) -> Result<(), Box<dyn Error>>;

    /// Bind a texture for subsequent glyph draws
    fn bind_texture(&mut self, texture: TextureHandle) -> Result<(), Box<dyn Error>>;

    /// Set the current draw colour (RGBA, 0.0-1.0)
    fn set_color(&mut self, color: Vec4) -> Result<(), Box<dyn Error>>;

    /// Save the current transform and translate by `(x, y)` pixels
    fn push_transform(&mut self, x: f32, y: f32) -> Result<(), Box<dyn Error>>;

    /// Restore the transform saved by the matching push
    fn pop_transform(&mut self) -> Result<(), Box<dyn Error>>;

    /// Execute a batch of previously defined commands in order
    fn call_commands(&mut self, commands: &[CommandId]) -> Result<(), Box<dyn Error>>;
}

impl<T: TextRenderBackend + ?Sized> TextRenderBackend for &mut T {
    fn upload_texture(&mut self, image: &ImageData) -> Result<TextureHandle, Box<dyn Error>> {
        (**self).upload_texture(image)
    }

    fn define_command(&mut self, id: CommandId, command: &PrecompiledCommand) -> Result<(), Box<dyn Error>> {
        (**self).define_command(id, command)
    }

    fn bind_texture(&mut self, texture: TextureHandle) -> Result<(), Box<dyn Error>> {
        (**self).bind_texture(texture)
    }

    fn set_color(&mut self, color: Vec4) -> Result<(), Box<dyn Error>> {
        (**self).set_color(color)
    }

    fn push_transform(&mut self, x: f32, y: f32) -> Result<(), Box<dyn Error>> {
        (**self).push_transform(x, y)
    }

    fn pop_transform(&mut self) -> Result<(), Box<dyn Error>> {
        (**self).pop_transform()
    }

    fn call_commands(&mut self, commands: &[CommandId]) -> Result<(), Box<dyn Error>> {
        (**self).call_commands(commands)
    }
}

/// A backend call captured by [`RecordingBackend`]
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    /// `bind_texture`
    BindTexture(TextureHandle),
    /// `set_color`
    SetColor(Vec4),
    /// `push_transform`
    PushTransform(f32, f32),
    /// `pop_transform`
    PopTransform,
    /// `call_commands`
    CallCommands(Vec<CommandId>),
}

/// A glyph as it would appear on screen
#[derive(Debug, Clone, PartialEq)]
pub struct DrawnGlyph {
    /// Atlas glyph index
    pub glyph: u8,
    /// Pen position in pixels
    pub x: f32,
    /// Pen position in pixels
    pub y: f32,
    /// Draw colour at the time of the draw
    pub color: Vec4,
    /// Texture bound at the time of the draw
    pub texture: Option<TextureHandle>,
}

/// Headless backend that records every call and replays commands in software
///
/// Used by tests and tools to inspect what a real backend would receive and
/// where glyphs would land.
#[derive(Debug)]
pub struct RecordingBackend {
    textures: Vec<ImageData>,
    commands: HashMap<CommandId, PrecompiledCommand>,
    calls: Vec<BackendCall>,
    drawn: Vec<DrawnGlyph>,
    bound: Option<TextureHandle>,
    color: Vec4,
    origin: (f32, f32),
    stack: Vec<(f32, f32)>,
    fail_uploads: bool,
}

impl RecordingBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self {
            textures: Vec::new(),
            commands: HashMap::new(),
            calls: Vec::new(),
            drawn: Vec::new(),
            bound: None,
            color: Vec4::new(1.0, 1.0, 1.0, 1.0),
            origin: (0.0, 0.0),
            stack: Vec::new(),
            fail_uploads: false,
        }
    }

    /// Make texture uploads fail (for exercising error paths)
    pub fn fail_uploads(&mut self, fail: bool) {
        self.fail_uploads = fail;
    }

    /// Uploaded textures, indexed by handle value
    pub fn textures(&self) -> &[ImageData] {
        &self.textures
    }

    /// Number of defined commands
    pub fn defined_commands(&self) -> usize {
        self.commands.len()
    }

    /// Look up a defined command
    pub fn command(&self, id: CommandId) -> Option<&PrecompiledCommand> {
        self.commands.get(&id)
    }

    /// Draw-time calls in order (uploads and definitions are not included)
    pub fn calls(&self) -> &[BackendCall] {
        &self.calls
    }

    /// The id lists passed to `call_commands`, in order
    pub fn batches(&self) -> Vec<&[CommandId]> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                BackendCall::CallCommands(ids) => Some(ids.as_slice()),
                _ => None,
            })
            .collect()
    }

    /// Glyphs drawn so far
    pub fn drawn(&self) -> &[DrawnGlyph] {
        &self.drawn
    }

    /// Number of transforms pushed and not yet popped
    pub fn transform_depth(&self) -> usize {
        self.stack.len()
    }

    /// Forget recorded draw calls and glyphs, keeping textures and commands
    pub fn clear(&mut self) {
        self.calls.clear();
        self.drawn.clear();
    }
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl TextRenderBackend for RecordingBackend {
    fn upload_texture(&mut self, image: &ImageData) -> Result<TextureHandle, Box<dyn Error>> {
        if self.fail_uploads {
            return Err("texture upload disabled".into());
        }
        let handle = TextureHandle(self.textures.len() as u64);
        self.textures.push(image.clone());
        Ok(handle)
    }

    fn define_command(&mut self, id: CommandId, command: &PrecompiledCommand) -> Result<(), Box<dyn Error>> {
        self.commands.insert(id, command.clone());
        Ok(())
    }

    fn bind_texture(&mut self, texture: TextureHandle) -> Result<(), Box<dyn Error>> {
        if texture.0 as usize >= self.textures.len() {
            return Err(format!("unknown texture {:?}", texture).into());
        }
        self.bound = Some(texture);
        self.calls.push(BackendCall::BindTexture(texture));
        Ok(())
    }

    fn set_color(&mut self, color: Vec4) -> Result<(), Box<dyn Error>> {
        self.color = color;
        self.calls.push(BackendCall::SetColor(color));
        Ok(())
    }

    fn push_transform(&mut self, x: f32, y: f32) -> Result<(), Box<dyn Error>> {
        self.stack.push(self.origin);
        self.origin = (self.origin.0 + x, self.origin.1 + y);
        self.calls.push(BackendCall::PushTransform(x, y));
        Ok(())
    }

    fn pop_transform(&mut self) -> Result<(), Box<dyn Error>> {
        self.origin = self.stack.pop().ok_or("transform stack underflow")?;
        self.calls.push(BackendCall::PopTransform);
        Ok(())
    }

    fn call_commands(&mut self, commands: &[CommandId]) -> Result<(), Box<dyn Error>> {
        for &id in commands {
            match self.commands.get(&id) {
                Some(PrecompiledCommand::Glyph { advance, .. }) => {
                    self.drawn.push(DrawnGlyph {
                        glyph: id.index() as u8,
                        x: self.origin.0,
                        y: self.origin.1,
                        color: self.color,
                        texture: self.bound,
                    });
                    self.origin.0 += *advance as f32;
                }
                Some(PrecompiledCommand::Color { rgb }) => {
                    self.color = Vec4::new(rgb.x, rgb.y, rgb.z, 1.0);
                }
                None => return Err(format!("undefined command {:?}", id).into()),
            }
        }
        self.calls.push(BackendCall::CallCommands(commands.to_vec()));
        Ok(())
    }
}
