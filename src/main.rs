use rasterkit::colour::Colour;
use rasterkit::config::RenderConfig;
use rasterkit::gfx::{Drawable, HighDPISurface, Surface, SurfaceViewPort};
use rasterkit::logging::{self, Logger};

const DEFAULT_CONFIG: &str = "rasterkit.json";

#[derive(Debug, Default)]
struct Options {
    input: Option<String>,
    output: Option<String>,
    scale: Option<f32>,
    fit: Option<(u32, u32)>,
    rotate: Option<i32>,
    alpha: Option<f32>,
    quantize: bool,
    demo: Option<(u32, u32)>,
    config: Option<String>,
    preview: bool,
    verbose: bool,
}

/// Parse `WxH` (e.g. 640x480)
fn parse_size(s: &str) -> Option<(u32, u32)> {
    let (w, h) = s.split_once('x')?;
    match (w.parse::<u32>(), h.parse::<u32>()) {
        (Ok(w), Ok(h)) if w > 0 && h > 0 => Some((w, h)),
        _ => None,
    }
}

fn print_help() {
    println!("Usage: rasterkit [OPTIONS] [INPUT]");
    println!();
    println!("Load an image (.tga, .jpg, .png), transform it and write it out.");
    println!();
    println!("Options:");
    println!("  --output PATH, -o PATH  Write the result (.jpg/.jpeg/.png)");
    println!("  --scale F               Box-filter scale by factor F");
    println!("  --fit WxH               Scale to fit inside WxH");
    println!("  --rotate 90|270         Rotate the image");
    println!("  --alpha F               Set every pixel's alpha to F (0..1)");
    println!("  --quantize              Keep only the top two bits per channel when scaling");
    println!("  --demo WxH              Render a test card instead of loading INPUT");
    println!("  --config PATH           Settings file (default: {})", DEFAULT_CONFIG);
    println!("  --preview               Show the result in a window");
    println!("  --verbose, -v           Debug logging");
    println!("  --help                  Show this help message");
}

fn parse_args() -> Result<Options, String> {
    let args: Vec<String> = std::env::args().collect();
    let mut opts = Options::default();

    let mut i = 1;
    while i < args.len() {
        let value = args.get(i + 1).map(String::as_str);
        let needs_value = |name: &str| value.ok_or_else(|| format!("{} needs a value", name));
        match args[i].as_str() {
            "--output" | "-o" => {
                opts.output = Some(needs_value("--output")?.to_string());
                i += 1;
            },
            "--scale" => {
                let v = needs_value("--scale")?;
                opts.scale = Some(v.parse().map_err(|_| format!("bad scale factor: {}", v))?);
                i += 1;
            },
            "--fit" => {
                let v = needs_value("--fit")?;
                opts.fit = Some(parse_size(v).ok_or_else(|| format!("bad size: {}", v))?);
                i += 1;
            },
            "--rotate" => {
                let v = needs_value("--rotate")?;
                opts.rotate = Some(v.parse().map_err(|_| format!("bad angle: {}", v))?);
                i += 1;
            },
            "--alpha" => {
                let v = needs_value("--alpha")?;
                opts.alpha = Some(v.parse().map_err(|_| format!("bad alpha: {}", v))?);
                i += 1;
            },
            "--demo" => {
                let v = needs_value("--demo")?;
                opts.demo = Some(parse_size(v).ok_or_else(|| format!("bad size: {}", v))?);
                i += 1;
            },
            "--config" => {
                opts.config = Some(needs_value("--config")?.to_string());
                i += 1;
            },
            "--quantize" => opts.quantize = true,
            "--preview" => opts.preview = true,
            "--verbose" | "-v" => opts.verbose = true,
            "--help" => {
                print_help();
                std::process::exit(0);
            },
            arg if arg.starts_with('-') => return Err(format!("unknown option: {}", arg)),
            arg => opts.input = Some(arg.to_string()),
        }
        i += 1;
    }

    Ok(opts)
}

/// Test card: gradient banner, a rounded panel drawn through a viewport,
/// circles, lines and a hue strip
fn draw_card(target: &mut dyn Drawable, background: u32) {
    let (w, h) = (target.width() as i32, target.height() as i32);
    target.clear(background);
    target.draw_grad(0, 0, w as u32, (h / 4) as u32, 0xff1e3c78, 0xff78c8f0);

    {
        let mut panel = SurfaceViewPort::new(&mut *target, w / 8, h / 3, (w * 3 / 4) as u32, (h / 2) as u32);
        let (pw, ph) = (panel.width(), panel.height());
        let r = pw.min(ph) / 8;
        panel.draw_rect_filled_rounded(0, 0, pw, ph, r, 0xff303844);
        panel.draw_rect_rounded(0, 0, pw, ph, r, 0xffe0e0e0);
        panel.draw_grad_rounded(4, 4, pw / 3, ph.saturating_sub(8), r, 0xffff8040, 0xff402010);

        let (cx, cy) = ((pw * 2 / 3) as i32, (ph / 2) as i32);
        let cr = pw.min(ph) / 4;
        panel.draw_circle_filled(cx, cy, cr, 0xff40c060);
        panel.draw_circle(cx, cy, cr + 3, 0xffffffff);
        panel.draw_circle_filled(cx + cr as i32, cy, cr / 2, 0x80ff2020);

        // Runs past the panel edge; the viewport clips it
        panel.draw_line(-10, ph as i32 + 10, pw as i32 + 10, -10, 0xffffff00);
        panel.draw_rect(pw as i32 / 3 + 8, 8, pw / 6, ph / 6, 0xff8080ff);
    }

    let strip = h - h / 8;
    for x in 0..w {
        let c = Colour::from_hsb(f64::from(x) / f64::from(w), 1.0, 1.0);
        target.draw_line(x, strip, x, h - 1, c.into());
    }
}

fn render_demo(width: u32, height: u32, config: &RenderConfig) -> Surface<'static> {
    let background = config.background_or_default().to_u32();
    if config.high_dpi {
        let mut card = HighDPISurface::new((width / 2).max(1), (height / 2).max(1));
        draw_card(&mut card, background);
        card.into_surface()
    } else {
        let mut card = Surface::new(width, height);
        draw_card(&mut card, background);
        card
    }
}

fn main() -> Result<(), String> {
    let opts = parse_args()?;

    let config_path = opts.config.as_deref().unwrap_or(DEFAULT_CONFIG);
    let config = RenderConfig::load_or_default(config_path)?;
    let level = if opts.verbose {
        log::LevelFilter::Debug
    } else {
        logging::level_from_name(&config.log_level)
    };
    Logger::init(level);

    let mut surface = match (opts.demo, &opts.input) {
        (Some((w, h)), _) => render_demo(w, h, &config),
        (None, Some(path)) => Surface::load_image(path).ok_or_else(|| format!("could not load {}", path))?,
        (None, None) => return Err("no input: give an image path or --demo WxH (see --help)".to_string()),
    };
    log::info!("source {}x{}", surface.width(), surface.height());

    if let Some((w, h)) = opts.fit {
        surface = surface
            .scale_to_fit(w, h, opts.quantize)
            .ok_or_else(|| format!("cannot fit into {}x{}", w, h))?;
    } else if let Some(factor) = opts.scale {
        surface = surface
            .scale(factor, opts.quantize)
            .ok_or_else(|| format!("cannot scale by {}", factor))?;
    }

    if let Some(angle) = opts.rotate {
        if !surface.rotate(angle) {
            return Err(format!("unsupported rotation: {} (use 90 or 270)", angle));
        }
    }

    if let Some(alpha) = opts.alpha {
        surface.set_alpha(alpha);
    }

    if let Some(out) = &opts.output {
        if !surface.save_image(out, config.jpeg_quality) {
            return Err(format!("could not write {}", out));
        }
        log::info!("wrote {} ({}x{})", out, surface.width(), surface.height());
    }

    if opts.preview {
        #[cfg(feature = "preview")]
        rasterkit::display::show("rasterkit", &surface)?;
        #[cfg(not(feature = "preview"))]
        log::warn!("--preview needs the `preview` feature");
    }

    Ok(())
}
