use std::path::Path;
use std::process;

use clap::{Parser, Subcommand};

use phonalign::align::align;
use phonalign::color;
use phonalign::table;

/// Unwrap a Result or print the error and exit.
macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

#[derive(Parser)]
#[command(name = "phonotool", about = "Phonocolor alignment tool")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert a Phonocolor export into the aligned dictionary table
    Convert {
        /// Input export (word;phonemes;colors)
        input: String,
        /// Output CSV file
        output: String,
    },
    /// Align a single row for debugging
    Align {
        /// The word
        word: String,
        /// Space-separated phoneme tokens
        phonemes: String,
        /// Raw color column value (brace or bracket syntax)
        colors: String,
        /// Print the alignment as JSON
        #[arg(long)]
        json: bool,
    },
    /// List rows whose alignment leaves phonemes unconsumed
    Check {
        /// Input export
        input: String,
    },
}

fn main() {
    #[cfg(feature = "trace")]
    let _guard = phonalign::trace_init::init_tracing(Path::new("."));

    let cli = Cli::parse();
    match cli.command {
        Command::Convert { input, output } => convert(&input, &output),
        Command::Align {
            word,
            phonemes,
            colors,
            json,
        } => align_one(&word, &phonemes, &colors, json),
        Command::Check { input } => check(&input),
    }
}

fn convert(input: &str, output: &str) {
    let summary = die!(
        table::convert_file(Path::new(input), Path::new(output)),
        "Error converting: {}"
    );
    eprintln!("Wrote {} rows to {output}", summary.rows);
    if summary.shortfalls > 0 {
        eprintln!(
            "{} rows left phonemes unconsumed (see `phonotool check`)",
            summary.shortfalls
        );
    }
}

fn align_one(word: &str, phonemes: &str, colors: &str, json: bool) {
    // Accept the raw export syntax directly.
    let cleaned: String = colors
        .chars()
        .filter(|&c| c != '"')
        .map(|c| match c {
            '{' => '[',
            '}' => ']',
            c => c,
        })
        .collect();
    let descriptors = color::parse_seq(&cleaned);
    let phonemes: Vec<String> = phonemes.split(' ').map(str::to_string).collect();

    let alignment = align(word, &phonemes, &descriptors);
    if json {
        let rendered = die!(
            serde_json::to_string_pretty(&alignment),
            "Error serializing: {}"
        );
        println!("{rendered}");
    } else {
        println!("phonemes:  {}", alignment.phonemes);
        println!("graphemes: {}", alignment.graphemes);
        if !alignment.leftover.is_empty() {
            println!("leftover:  {}", alignment.leftover);
        }
    }
}

fn check(input: &str) {
    let rows = die!(
        table::read_export(Path::new(input)),
        "Error reading export: {}"
    );
    let mut shortfalls = 0usize;
    for (row, alignment) in table::align_rows(&rows) {
        if !alignment.leftover.is_empty() {
            shortfalls += 1;
            println!(
                "{}: leftover {} (aligned {})",
                row.word, alignment.leftover, row.clean_phonemes
            );
        }
    }
    eprintln!("{shortfalls} of {} rows under-consume their phonemes", rows.len());
}
