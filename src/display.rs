//! SDL2 preview window for a rendered surface.

use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::{Canvas, Texture, TextureCreator};
use sdl2::video::{Window, WindowContext};
use sdl2::EventPump;

use crate::gfx::{Drawable, Surface};

pub struct Display {
    canvas: Canvas<Window>,
    event_pump: EventPump,
    width: u32,
    height: u32,
}

impl Display {
    pub fn with_options(
        title: &str,
        width: u32,
        height: u32,
        vsync: bool,
    ) -> Result<(Self, TextureCreator<WindowContext>), String> {
        let sdl_context = sdl2::init()?;
        let video_subsystem = sdl_context.video()?;

        let window = video_subsystem
            .window(title, width, height)
            .position_centered()
            .build()
            .map_err(|e| e.to_string())?;

        let mut canvas_builder = window.into_canvas().accelerated();
        if vsync {
            canvas_builder = canvas_builder.present_vsync();
        }
        let canvas = canvas_builder.build().map_err(|e| e.to_string())?;

        let texture_creator = canvas.texture_creator();
        let event_pump = sdl_context.event_pump()?;

        Ok((
            Self {
                canvas,
                event_pump,
                width,
                height,
            },
            texture_creator,
        ))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Streaming texture matching the surface byte order.
    /// Buffers hold little-endian `0xAARRGGBB`, which is SDL's ARGB8888.
    pub fn create_texture<'t>(
        &self,
        texture_creator: &'t TextureCreator<WindowContext>,
        surface: &Surface<'_>,
    ) -> Result<Texture<'t>, String> {
        texture_creator
            .create_texture_streaming(PixelFormatEnum::ARGB8888, surface.width(), surface.height())
            .map_err(|e| e.to_string())
    }

    pub fn present(&mut self, texture: &mut Texture, surface: &Surface<'_>) -> Result<(), String> {
        texture
            .update(None, surface.data(), surface.stride())
            .map_err(|e| e.to_string())?;

        self.canvas.copy(texture, None, None)?;
        self.canvas.present();
        Ok(())
    }

    /// True once the window is closed or Escape is pressed
    pub fn quit_requested(&mut self) -> bool {
        self.event_pump.poll_iter().any(|event| {
            matches!(
                event,
                Event::Quit { .. }
                    | Event::KeyDown {
                        keycode: Some(Keycode::Escape),
                        ..
                    }
            )
        })
    }
}

/// Show `surface` in a window until the user closes it
pub fn show(title: &str, surface: &Surface<'_>) -> Result<(), String> {
    let (mut display, texture_creator) = Display::with_options(title, surface.width(), surface.height(), true)?;
    let mut texture = display.create_texture(&texture_creator, surface)?;
    log::info!("preview {}x{}, Escape to close", display.width(), display.height());

    while !display.quit_requested() {
        display.present(&mut texture, surface)?;
    }
    Ok(())
}
