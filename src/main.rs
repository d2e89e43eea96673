mod adapters;
mod core;
mod pipeline;
mod ui;

use crate::core::error::print_error;
use clap::Parser;

/// Interactive release pipeline for npm packages (with optional JSR publish)
#[derive(Parser)]
#[command(name = "liftoff")]
#[command(version, about, long_about = None)]
#[command(styles = get_styles())]
struct Cli {}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  // All choices are interactive; argv only carries --help and --version
  let _cli = Cli::parse();

  let project_dir = match std::env::current_dir() {
    Ok(dir) => dir,
    Err(e) => {
      eprintln!("Error: Failed to get current directory: {}", e);
      std::process::exit(1);
    }
  };

  let stdin = std::io::stdin();
  let mut input = stdin.lock();

  if let Err(err) = pipeline::run(&project_dir, &mut input) {
    print_error(&err);
    std::process::exit(1);
  }
}
