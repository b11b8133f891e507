mod logger;

use anyhow::{Context, Result, bail};
use card_maker::{
    CanvasOptions, CardCanvas, ChromeRenderer, Font, HorizontalAnchor, HtmlStyle, ResizeRequest,
    TextAlign, TextAnchor, TextOptions, VerticalAnchor,
};
use card_sheets::{ContactSheet, ContactSheetOptions, PrintCard, PrintLayout, PrintOptions};
use card_workbook::{Workbook, load_card_text};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use logger::StderrLogger;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "cardt", about = "Card making tools CLI", version)]
struct Cli {
    /// More logging: -v for debug, -vv for trace
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack card images into a single contact sheet image
    ContactSheet {
        /// Card images, in order
        #[arg(short, long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,

        /// Output image file
        #[arg(short, long)]
        output: PathBuf,

        /// Cell width in pixels
        #[arg(long)]
        card_width: u32,

        /// Cell height in pixels
        #[arg(long)]
        card_height: u32,

        /// Cells per row
        #[arg(long, default_value = "3")]
        columns: usize,

        /// Number of rows (default: enough for all inputs)
        #[arg(long, conflicts_with = "cards")]
        rows: Option<usize>,

        /// Number of cards to make room for
        #[arg(long)]
        cards: Option<usize>,
    },

    /// Lay card images out on printable PDF pages with cutting marks
    Print {
        /// Card front images, in order
        #[arg(short, long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,

        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,

        /// Back image used for every card
        #[arg(long)]
        back: Option<PathBuf>,

        /// Options file (JSON) to start from
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write the final options to this file (JSON)
        #[arg(long)]
        save_config: Option<PathBuf>,

        /// Card width in mm
        #[arg(long)]
        card_width_mm: Option<f64>,

        /// Card height in mm
        #[arg(long)]
        card_height_mm: Option<f64>,

        /// Gutter around each card in mm
        #[arg(long)]
        gutter_mm: Option<f64>,

        /// Card shape, which decides the cutting marks
        #[arg(long, value_enum)]
        shape: Option<ShapeArg>,

        /// Axis the backs are mirrored on
        #[arg(long, value_enum)]
        flip: Option<FlipArg>,

        /// Paper size
        #[arg(long, value_enum)]
        paper: Option<PaperArg>,

        /// Paper orientation
        #[arg(long, value_enum)]
        orientation: Option<OrientationArg>,

        /// Do not emit pages of backs
        #[arg(long)]
        no_backs: bool,
    },

    /// Render one card image per CSV row (columns: title, body)
    Cards {
        /// Input CSV file with a header row
        #[arg(long)]
        csv: PathBuf,

        /// TrueType font for all text
        #[arg(long)]
        font: PathBuf,

        /// Output directory for card images
        #[arg(short, long)]
        output: PathBuf,

        /// Card width in mm
        #[arg(long, default_value = "63")]
        width_mm: f64,

        /// Card height in mm
        #[arg(long, default_value = "88")]
        height_mm: f64,

        /// Output resolution
        #[arg(long, default_value = "300")]
        dpi: f64,

        /// Margin inside the card edge in mm
        #[arg(long, default_value = "4")]
        margin_mm: f64,

        /// Title text height in mm
        #[arg(long, default_value = "6")]
        title_size_mm: f64,

        /// Body text height in mm
        #[arg(long, default_value = "3.5")]
        body_size_mm: f64,

        /// Image stretched over the whole card before the text
        #[arg(long)]
        background: Option<PathBuf>,

        /// Treat the body as HTML and render it with a headless browser
        #[arg(long)]
        html: bool,

        /// Browser executable for --html
        #[arg(long, requires = "html")]
        browser: Option<PathBuf>,

        /// Also pack all cards into this contact sheet
        #[arg(long)]
        sheet: Option<PathBuf>,

        /// Contact sheet columns
        #[arg(long, default_value = "3")]
        columns: usize,
    },

    /// Look a value up in a CSV workbook
    Lookup {
        /// Workbook CSV file (no header row)
        #[arg(short, long)]
        workbook: PathBuf,

        /// Value to search for
        #[arg(long)]
        value: String,

        /// Print the run of values to the right of the match
        #[arg(long, conflicts_with = "below")]
        beside: bool,

        /// Print the run of values below the match
        #[arg(long)]
        below: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ShapeArg {
    Rectangle,
    Circle,
}

#[derive(Clone, Copy, ValueEnum)]
enum FlipArg {
    Horizontal,
    Vertical,
}

#[derive(Clone, Copy, ValueEnum)]
enum PaperArg {
    A3,
    A4,
    A5,
    Letter,
    Legal,
    Tabloid,
}

#[derive(Clone, Copy, ValueEnum)]
enum OrientationArg {
    Portrait,
    Landscape,
}

impl From<ShapeArg> for card_sheets::CardShape {
    fn from(arg: ShapeArg) -> Self {
        match arg {
            ShapeArg::Rectangle => Self::Rectangle,
            ShapeArg::Circle => Self::Circle,
        }
    }
}

impl From<FlipArg> for card_sheets::Flip {
    fn from(arg: FlipArg) -> Self {
        match arg {
            FlipArg::Horizontal => Self::Horizontal,
            FlipArg::Vertical => Self::Vertical,
        }
    }
}

impl From<PaperArg> for card_sheets::PaperSize {
    fn from(arg: PaperArg) -> Self {
        match arg {
            PaperArg::A3 => Self::A3,
            PaperArg::A4 => Self::A4,
            PaperArg::A5 => Self::A5,
            PaperArg::Letter => Self::Letter,
            PaperArg::Legal => Self::Legal,
            PaperArg::Tabloid => Self::Tabloid,
        }
    }
}

impl From<OrientationArg> for card_sheets::Orientation {
    fn from(arg: OrientationArg) -> Self {
        match arg {
            OrientationArg::Portrait => Self::Portrait,
            OrientationArg::Landscape => Self::Landscape,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    StderrLogger::new(StderrLogger::level_for_verbosity(cli.verbose))
        .init()
        .context("Failed to install logger")?;

    match cli.command {
        Commands::ContactSheet {
            input,
            output,
            card_width,
            card_height,
            columns,
            rows,
            cards,
        } => {
            let mut options = ContactSheetOptions::new(card_width, card_height);
            options.columns = columns;
            options.rows = rows;
            options.cards = match (rows, cards) {
                (None, None) => Some(input.len()),
                _ => cards,
            };

            let mut sheet = ContactSheet::new(options)?;
            for path in &input {
                sheet
                    .add(path.as_path())
                    .with_context(|| format!("Failed to add {}", path.display()))?;
            }
            sheet.save(&output)?;
            println!(
                "Placed {} cards on a {}x{} sheet → {}",
                sheet.len(),
                sheet.columns(),
                sheet.rows(),
                output.display()
            );
        }

        Commands::Print {
            input,
            output,
            back,
            config,
            save_config,
            card_width_mm,
            card_height_mm,
            gutter_mm,
            shape,
            flip,
            paper,
            orientation,
            no_backs,
        } => {
            let mut options = match &config {
                Some(path) => PrintOptions::load(path)
                    .with_context(|| format!("Failed to load {}", path.display()))?,
                None => PrintOptions::default(),
            };
            if let Some(v) = card_width_mm {
                options.card_width_mm = v;
            }
            if let Some(v) = card_height_mm {
                options.card_height_mm = v;
            }
            if let Some(v) = gutter_mm {
                options.gutter_mm = v;
            }
            if let Some(v) = shape {
                options.shape = v.into();
            }
            if let Some(v) = flip {
                options.flip = v.into();
            }
            if let Some(v) = paper {
                options.paper = v.into();
            }
            if let Some(v) = orientation {
                options.orientation = v.into();
            }
            if no_backs {
                options.include_backs = false;
            }
            if let Some(path) = &save_config {
                options.save(path)?;
                info!("Saved options to {}", path.display());
            }

            let mut layout = PrintLayout::new(options)?;
            let per_page = layout.cards_per_page();
            for path in &input {
                let mut card = PrintCard::new(path.as_path());
                if let Some(back) = &back {
                    card = card.with_back(back.as_path());
                }
                layout
                    .add(card)
                    .with_context(|| format!("Failed to place {}", path.display()))?;
            }
            layout.add_backs_page()?;
            layout.output(&output)?;
            println!(
                "Laid out {} cards, {} per page → {}",
                layout.card_count(),
                per_page,
                output.display()
            );
        }

        Commands::Cards {
            csv,
            font,
            output,
            width_mm,
            height_mm,
            dpi,
            margin_mm,
            title_size_mm,
            body_size_mm,
            background,
            html,
            browser,
            sheet,
            columns,
        } => {
            let cards = load_card_text(&csv)?;
            if cards.is_empty() {
                bail!("No cards found in {}", csv.display());
            }
            std::fs::create_dir_all(&output)?;

            let style = CardStyle {
                width_px: width_mm / 25.4 * dpi,
                width_mm,
                height_mm,
                margin_mm,
                title_size_mm,
                body_size_mm,
            };
            let px_per_mm = dpi / 25.4;
            let title_font = Font::from_file(&font, (title_size_mm * px_per_mm) as f32)?;
            let body_font = title_font.resized((body_size_mm * px_per_mm) as f32);

            let mut rendered = Vec::with_capacity(cards.len());
            for (i, card) in cards.iter().enumerate() {
                let mut canvas = CardCanvas::new(
                    CanvasOptions::mm(style.width_mm, style.height_mm, style.width_px)
                        .with_colour(image::Rgba([255, 255, 255, 255])),
                )?;
                if let Some(background) = &background {
                    canvas.paste(
                        background.as_path(),
                        ResizeRequest::size(style.width_mm, style.height_mm),
                        HorizontalAnchor::Left(0.0),
                        VerticalAnchor::Top(0.0),
                    )?;
                }
                if html {
                    if let Some(browser) = &browser {
                        canvas.set_html_renderer(Box::new(ChromeRenderer::with_browser(browser)?));
                    }
                }

                draw_card(&mut canvas, &style, &title_font, &body_font, &card.title, &card.body, html)
                    .with_context(|| format!("Failed to draw card {} ({})", i + 1, card.title))?;

                let path = output.join(format!("card_{:03}.png", i + 1));
                canvas.save(&path)?;
                info!("Wrote {}", path.display());
                rendered.push(canvas);
            }

            if let Some(sheet_path) = &sheet {
                write_sheet(&rendered, columns, sheet_path)?;
            }
            println!("Rendered {} cards → {}", rendered.len(), output.display());
        }

        Commands::Lookup {
            workbook,
            value,
            beside,
            below,
        } => {
            let wb = Workbook::load(&workbook)?;
            let cell = wb.find(&value, card_workbook::DEFAULT_SEARCH_LIMIT, card_workbook::DEFAULT_SEARCH_LIMIT)?;
            if beside {
                print_values(&wb.find_values_beside(cell)?);
            } else if below {
                print_values(&wb.find_values_below(cell)?);
            } else {
                let next = wb.get(cell.right()).unwrap_or("");
                println!("{}\t{}", cell, next);
            }
        }
    }

    Ok(())
}

/// Card layout for the `cards` command; lengths in mm
struct CardStyle {
    width_px: f64,
    width_mm: f64,
    height_mm: f64,
    margin_mm: f64,
    title_size_mm: f64,
    body_size_mm: f64,
}

fn draw_card(
    canvas: &mut CardCanvas,
    style: &CardStyle,
    title_font: &Font,
    body_font: &Font,
    title: &str,
    body: &str,
    html: bool,
) -> Result<()> {
    let title_bounds = canvas.text(
        title,
        &TextOptions::new(
            title_font,
            HorizontalAnchor::Centre(style.width_mm / 2.0),
            TextAnchor::Top(style.margin_mm),
        )
        .with_width(style.width_mm - 2.0 * style.margin_mm),
    )?;

    let body_top = title_bounds.bottom + style.margin_mm;
    let body_width = style.width_mm - 2.0 * style.margin_mm;
    if html {
        let html_style = HtmlStyle {
            h_align: Some(TextAlign::Left),
            font_size: Some(style.body_size_mm),
            ..Default::default()
        };
        canvas.html(body, style.margin_mm, body_top, body_width, None, &html_style)?;
    } else if !body.is_empty() {
        canvas.text(
            body,
            &TextOptions::new(
                body_font,
                HorizontalAnchor::Left(style.margin_mm),
                TextAnchor::Top(body_top),
            )
            .with_width(body_width),
        )?;
    }
    Ok(())
}

fn write_sheet(cards: &[CardCanvas], columns: usize, path: &Path) -> Result<()> {
    let Some(first) = cards.first() else {
        return Ok(());
    };
    let (width, height) = first.size_px();
    let mut options = ContactSheetOptions::new(width, height);
    options.columns = columns;
    options.cards = Some(cards.len());

    let mut sheet = ContactSheet::new(options)?;
    for card in cards {
        sheet.add(card)?;
    }
    sheet.save(path)?;
    Ok(())
}

fn print_values(values: &[String]) {
    for value in values {
        println!("{}", value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_print_arguments() {
        let cli = Cli::try_parse_from([
            "cardt", "-v", "print", "-i", "a.png", "b.png", "-o", "out.pdf", "--shape", "circle",
            "--no-backs",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Print {
                input,
                shape,
                no_backs,
                ..
            } => {
                assert_eq!(input.len(), 2);
                assert!(matches!(shape, Some(ShapeArg::Circle)));
                assert!(no_backs);
            }
            _ => panic!("Expected print command"),
        }
    }

    #[test]
    fn test_rows_and_cards_conflict() {
        let result = Cli::try_parse_from([
            "cardt",
            "contact-sheet",
            "-i",
            "a.png",
            "-o",
            "s.png",
            "--card-width",
            "10",
            "--card-height",
            "10",
            "--rows",
            "2",
            "--cards",
            "4",
        ]);
        assert!(result.is_err());
    }
}
