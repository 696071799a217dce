//! CLI entry point for the tta-asm binary.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;

use assembler::boot::boot_program;
use assembler::image::render_image;
use assembler::listing::render_listing;
use harness_core as _;
#[cfg(test)]
use tempfile as _;

const USAGE_TEXT: &str = "\
Usage: tta-asm [options]

Builds the boot program and writes it as a textual memory image.

Options:
  -o, --output <file>  Output file path (default: bootmem.mem)
  -l, --listing        Print the symbolic listing to stderr
  -h, --help           Show this help message

Examples:
  tta-asm
  tta-asm -o images/boot.mem --listing
";

const DEFAULT_OUTPUT: &str = "bootmem.mem";

#[derive(Debug, PartialEq, Eq)]
struct Args {
    output: Option<PathBuf>,
    listing: bool,
}

#[derive(Debug)]
enum ParseResult {
    Run(Args),
    Help,
}

#[allow(clippy::while_let_on_iterator)]
fn parse_args(mut args: impl Iterator<Item = OsString>) -> Result<ParseResult, String> {
    let mut output: Option<PathBuf> = None;
    let mut listing = false;

    while let Some(arg) = args.next() {
        if arg == "--help" || arg == "-h" {
            return Ok(ParseResult::Help);
        }

        if arg == "--listing" || arg == "-l" {
            listing = true;
            continue;
        }

        if arg == "-o" || arg == "--output" {
            let value = args
                .next()
                .ok_or_else(|| "missing value for -o".to_string())?;
            output = Some(PathBuf::from(value));
            continue;
        }

        return Err(format!("unknown option: {}", arg.to_string_lossy()));
    }

    Ok(ParseResult::Run(Args { output, listing }))
}

fn run(args: Args) -> Result<(), i32> {
    let program = boot_program();

    let image = match render_image(&program) {
        Ok(image) => image,
        Err(e) => {
            eprintln!("error: {e}");
            return Err(1);
        }
    };
    let word_count = image.split_whitespace().count();

    let output_path = args
        .output
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

    if let Err(e) = fs::write(&output_path, &image) {
        eprintln!("error: failed to write output: {e}");
        return Err(1);
    }

    if args.listing {
        eprint!("{}", render_listing(&program));
    }

    println!(
        "Wrote {} transports ({} words) -> {}",
        program.len(),
        word_count,
        output_path.display()
    );

    Ok(())
}

fn main() {
    let exit_code = match parse_args(env::args_os().skip(1)) {
        Ok(ParseResult::Help) => {
            println!("{USAGE_TEXT}");
            0
        }
        Ok(ParseResult::Run(args)) => match run(args) {
            Ok(()) => 0,
            Err(code) => code,
        },
        Err(error) => {
            eprintln!("error: {error}");
            eprintln!("{USAGE_TEXT}");
            1
        }
    };

    std::process::exit(exit_code);
}
