//! Wren CLI
//!
//! Headless renderer for testing and debugging: loads a JSON element tree,
//! styles it, lays it out and writes a PNG or prints the pipeline stages.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use owo_colors::OwoColorize;
use wren_css::{DisplayCommand, DisplayList, LayoutOptions};
use wren_dom::{DomTree, NodeId, NodeType};
use wren_render::{
    FontSet, FontdueFontMetrics, FsImageLoader, LoadedDocument, RenderOptions, Renderer,
    load_document,
};

#[derive(Parser, Debug)]
#[command(name = "wren")]
#[command(author, version, about = "Render a styled element tree to a PNG", long_about = None)]
#[command(after_help = r#"EXAMPLES:
    wren page.json -o page.png
    wren page.json --width 800 --height 600 -o page.png
    wren page.json --css extra.css --visited https://example.com/ -o page.png
    wren page.json --dump
    wren page.json --json > styles.json
"#)]
struct Cli {
    /// JSON element tree to render
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Write the rendering to this PNG file
    #[arg(short = 'o', long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Canvas width in pixels
    #[arg(long, default_value = "500")]
    width: u32,

    /// Canvas height in pixels
    #[arg(long, default_value = "300")]
    height: u32,

    /// Extra stylesheet applied after the page's own (repeatable)
    #[arg(long = "css", value_name = "FILE")]
    css: Vec<PathBuf>,

    /// URL that `:visited` links match (repeatable)
    #[arg(long, value_name = "URL")]
    visited: Vec<String>,

    /// Skip the built-in default stylesheet
    #[arg(long)]
    no_default_css: bool,

    /// Font file used for all text instead of the system fonts
    #[arg(long, value_name = "FILE")]
    font: Option<PathBuf>,

    /// Print the tree, rules, styles and display list
    #[arg(short, long)]
    dump: bool,

    /// Print the computed style of every element as JSON
    #[arg(long, conflicts_with = "dump")]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let extra_css = cli
        .css
        .iter()
        .map(|path| {
            fs::read_to_string(path)
                .with_context(|| format!("failed to read stylesheet '{}'", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    let options = RenderOptions {
        layout: LayoutOptions {
            width: cli.width,
            height: cli.height,
        },
        visited: cli.visited.clone(),
        extra_css,
        use_default_css: !cli.no_default_css,
    };
    let doc = load_document(&cli.input, &options)?;

    let fonts = match &cli.font {
        Some(path) => FontSet::from_file(path)
            .with_context(|| format!("failed to load font '{}'", path.display()))?,
        None => FontSet::load_system(),
    };
    let images = doc
        .base_dir()
        .map_or_else(FsImageLoader::new, FsImageLoader::with_base_dir);
    let metrics = FontdueFontMetrics::new(&fonts);
    let display_list = doc.layout(&options.layout, &metrics, &images);

    if cli.json {
        println!("{}", styles_json(&doc)?);
    } else if cli.dump || cli.output.is_none() {
        dump(&doc, &display_list);
    }

    if let Some(output) = &cli.output {
        let mut renderer = Renderer::new(options.layout.width, options.layout.height, &fonts);
        renderer.render(&display_list);
        renderer.save(output)?;
        println!(
            "{} {} ({}x{})",
            "Wrote".green().bold(),
            output.display(),
            options.layout.width,
            options.layout.height
        );
    }

    Ok(())
}

fn dump(doc: &LoadedDocument, display_list: &DisplayList) {
    println!("{}", "=== DOM Tree ===".bold());
    print_tree(&doc.dom, NodeId::ROOT, 0);

    println!("\n{}", "=== Stylesheet ===".bold());
    println!("{} rules", doc.stylesheet.len());
    for rule in doc.stylesheet.rules() {
        println!(
            "  {} {{ {} declarations }}",
            rule.selector_text.cyan(),
            rule.declarations.len()
        );
    }

    println!("\n{}", "=== Computed Styles ===".bold());
    println!("{} styled nodes", doc.styles.len());
    print_styles(doc, NodeId::ROOT, 0);

    println!("\n{}", "=== Display List ===".bold());
    println!("{} commands", display_list.len());
    for command in display_list {
        print_command(command);
    }
}

/// Computed styles keyed by `<index>:<tag>`, in document order.
fn styles_json(doc: &LoadedDocument) -> Result<String> {
    let styles: BTreeMap<String, _> = doc
        .styles
        .iter()
        .filter_map(|(id, style)| {
            let tag = doc.dom.tag_name(*id)?;
            Some((format!("{:05}:{tag}", id.0), style))
        })
        .collect();
    serde_json::to_string_pretty(&styles).context("failed to serialize computed styles")
}

fn print_tree(tree: &DomTree, id: NodeId, indent: usize) {
    let prefix = "  ".repeat(indent);
    let Some(node) = tree.get(id) else {
        return;
    };
    match &node.node_type {
        NodeType::Document => println!("{prefix}Document"),
        NodeType::Element(data) => {
            let attrs: String = data
                .attrs
                .iter()
                .map(|attr| format!(" {}=\"{}\"", attr.name, attr.value))
                .collect();
            println!("{prefix}<{}{}>", data.tag_name.blue(), attrs);
        }
        NodeType::Text(text) => {
            let display = text.replace('\n', "\\n").replace(' ', "\u{00B7}");
            println!("{prefix}\"{}\"", display.dimmed());
        }
        NodeType::Comment(text) => println!("{prefix}<!-- {text} -->"),
    }
    for &child in tree.children(id) {
        print_tree(tree, child, indent + 1);
    }
}

fn print_styles(doc: &LoadedDocument, id: NodeId, indent: usize) {
    if let Some(tag) = doc.dom.tag_name(id)
        && let Some(style) = doc.styles.get(&id)
    {
        let prefix = "  ".repeat(indent);
        let declarations: Vec<String> = style
            .iter()
            .map(|(name, value)| format!("{name}: {value}"))
            .collect();
        println!("{prefix}{} {{ {} }}", tag.blue(), declarations.join("; "));
    }
    for &child in doc.dom.children(id) {
        print_styles(doc, child, indent + 1);
    }
}

fn print_command(command: &DisplayCommand) {
    let b = command.bounds();
    let at = format!("({}, {}) {}x{}", b.x, b.y, b.width, b.height);
    match command {
        DisplayCommand::FillRect { color, .. } => {
            println!("  {} {at} {}", "FillRect".yellow(), color.to_hex_string());
        }
        DisplayCommand::FillCircle { color, .. } => {
            println!("  {} {at} {}", "FillCircle".yellow(), color.to_hex_string());
        }
        DisplayCommand::DrawText { run, .. } => {
            println!(
                "  {} {at} {:?} {}px {}",
                "DrawText".yellow(),
                run.text,
                run.font_size,
                run.color.to_hex_string()
            );
        }
        DisplayCommand::DrawImage { image, .. } => {
            println!(
                "  {} {at} {}x{} source",
                "DrawImage".yellow(),
                image.width(),
                image.height()
            );
        }
    }
}
