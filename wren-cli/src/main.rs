//! Wren CLI
//!
//! Runs markup through the wren pipeline and prints what each stage makes
//! of it: the parsed tree, the rich-text layout, normalized markup, plain
//! text, linkified markup, or a split style attribute.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use owo_colors::OwoColorize;
use serde::Serialize;
use wren_common::warning::{clear_warnings, set_quiet};
use wren_css::{Declaration, resolve_color, split_declarations};
use wren_dom::{Node, serialize_nodes};
use wren_html::{linkify_html, parse, parse_xml, print_tree};
use wren_richtext::{Align, Item, LineInfo, RichText};

/// Wren: tolerant markup parsing and rich-text layout
#[derive(Parser, Debug)]
#[command(name = "wren")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Print the parsed tree of a file
    wren tree ./page.html

    # Lay out inline markup 300px wide, centered
    wren layout --width 300 --align center --html '<h1>Title</h1>body'

    # Normalize markup through the rich-text model
    wren html --html '<b>a<i>b</b>c'

    # Turn bare URLs into links
    wren linkify --html 'see www.example.com'

    # Inspect a style attribute
    wren style 'color: red; font-weight: bold'
"#)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Do not print warnings about repaired input
    #[arg(short, long, global = true)]
    quiet: bool,
}

/// Where the markup comes from.
#[derive(Args, Debug)]
struct Input {
    /// Path to a markup file
    #[arg(value_name = "FILE")]
    path: Option<PathBuf>,

    /// Parse this markup string instead of a file
    #[arg(long, value_name = "HTML", conflicts_with = "path")]
    html: Option<String>,
}

impl Input {
    fn load(&self) -> Result<String> {
        if let Some(ref html) = self.html {
            Ok(html.clone())
        } else if let Some(ref path) = self.path {
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
        } else {
            bail!("no input: pass a file path or --html")
        }
    }
}

/// Default font for the rich-text commands.
#[derive(Args, Debug)]
struct FontOptions {
    /// Default font family
    #[arg(long, default_value = "sans-serif")]
    font_family: String,

    /// Default font size in pixels
    #[arg(long, default_value = "16")]
    font_size: f32,

    /// Multiplier applied to every font size when measuring
    #[arg(long, default_value = "1")]
    scale: f32,
}

impl FontOptions {
    fn rich_text(&self, markup: &str) -> RichText {
        let mut rich = RichText::new(self.font_family.clone(), self.font_size)
            .with_draw_scale(self.scale);
        rich.set_html(markup);
        rich
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the parsed tree
    Tree {
        #[command(flatten)]
        input: Input,

        /// Parse without void elements; every tag needs a closer or `/>`
        #[arg(long)]
        xml: bool,

        /// Print indented markup instead of the debug dump
        #[arg(long)]
        markup: bool,
    },
    /// Lay the markup out and print positioned fragments as JSON
    Layout {
        #[command(flatten)]
        input: Input,

        #[command(flatten)]
        font: FontOptions,

        /// Maximum line width in pixels (unbounded when omitted)
        #[arg(long)]
        width: Option<f32>,

        /// Alignment for lines without their own: left, center, right, justified
        #[arg(long)]
        align: Option<Align>,
    },
    /// Convert to rich text and print its markup
    Html {
        #[command(flatten)]
        input: Input,

        #[command(flatten)]
        font: FontOptions,
    },
    /// Print the visible text
    Text {
        #[command(flatten)]
        input: Input,
    },
    /// Wrap bare URLs in links
    Linkify {
        #[command(flatten)]
        input: Input,

        /// Leave out `target="_blank"` on the new anchors
        #[arg(long)]
        same_tab: bool,
    },
    /// Print a style attribute's declarations and text color as JSON
    Style {
        /// Contents of a style attribute
        #[arg(value_name = "STYLE")]
        style: String,
    },
}

/// What a command produced.
#[derive(Debug)]
enum Output {
    Tree(Vec<Node>),
    Text(String),
}

#[derive(Serialize)]
struct LayoutReport<'a> {
    width: f32,
    height: f32,
    lines: &'a [LineInfo],
    items: &'a [Item],
}

#[derive(Serialize)]
struct StyleReport {
    declarations: Vec<Declaration>,
    color: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    set_quiet(cli.quiet);
    clear_warnings();

    match run(&cli.command)? {
        Output::Tree(nodes) => {
            println!("{}", "=== Tree ===".bold());
            print_tree(&nodes);
        }
        Output::Text(text) => println!("{text}"),
    }
    Ok(())
}

fn run(command: &Command) -> Result<Output> {
    let output = match command {
        Command::Tree { input, xml, markup } => {
            let source = input.load()?;
            let nodes = if *xml {
                parse_xml(&source)
            } else {
                parse(&source)
            };
            if *markup {
                Output::Text(serialize_nodes(&nodes, true, 2))
            } else {
                Output::Tree(nodes)
            }
        }
        Command::Layout {
            input,
            font,
            width: max_width,
            align,
        } => {
            let mut rich = font.rich_text(&input.load()?);
            let (width, height) = rich.layout(*max_width, *align);
            let report = LayoutReport {
                width,
                height,
                lines: rich.lines(),
                items: rich.fragments(),
            };
            Output::Text(serde_json::to_string_pretty(&report)?)
        }
        Command::Html { input, font } => Output::Text(font.rich_text(&input.load()?).html()),
        Command::Text { input } => {
            let mut rich = RichText::new("sans-serif", 16.0);
            rich.set_html(&input.load()?);
            Output::Text(rich.text())
        }
        Command::Linkify { input, same_tab } => {
            Output::Text(linkify_html(&input.load()?, !*same_tab))
        }
        Command::Style { style } => {
            let declarations = split_declarations(style);
            let color = declarations
                .iter()
                .filter(|decl| decl.is("color"))
                .find_map(|decl| resolve_color(&decl.value));
            let report = StyleReport {
                declarations,
                color,
            };
            Output::Text(serde_json::to_string_pretty(&report)?)
        }
    };
    Ok(output)
}
