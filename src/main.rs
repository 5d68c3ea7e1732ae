use line_sieve::{
    filter_lines_streaming, filter_to_archive, DigestAlgorithm, FilterMode, DEFAULT_MAX_RECORD_LEN,
};
use rustc_hash::FxHashSet;
use std::env;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

fn main() -> io::Result<()> {
    let args: Vec<String> = env::args().collect();

    let mut raw = false;
    let mut allowlist_file: Option<&str> = None;
    let mut blocklist_file: Option<&str> = None;
    let mut keep_containing: Option<&str> = None;
    let mut drop_containing: Option<&str> = None;
    let mut entry_name: Option<&str> = None;
    let mut digest_algorithm: Option<DigestAlgorithm> = None;
    let mut max_record_len = DEFAULT_MAX_RECORD_LEN;
    let mut positional: Vec<&str> = Vec::new();

    let mut i = 1; // Start after program name
    while i < args.len() {
        match args[i].as_str() {
            "--raw" => {
                raw = true;
                i += 1;
            }
            "--allow" => {
                allowlist_file = Some(flag_value(&args, i, "a file path"));
                i += 2;
            }
            "--block" => {
                blocklist_file = Some(flag_value(&args, i, "a file path"));
                i += 2;
            }
            "--keep-containing" => {
                keep_containing = Some(flag_value(&args, i, "a substring"));
                i += 2;
            }
            "--drop-containing" => {
                drop_containing = Some(flag_value(&args, i, "a substring"));
                i += 2;
            }
            "--entry-name" => {
                entry_name = Some(flag_value(&args, i, "a name"));
                i += 2;
            }
            "--digest" => {
                let value = flag_value(&args, i, "an algorithm (sha256, sha512)");
                digest_algorithm = match value.to_lowercase().as_str() {
                    "sha256" | "sha-256" => Some(DigestAlgorithm::Sha256),
                    "sha512" | "sha-512" => Some(DigestAlgorithm::Sha512),
                    _ => {
                        eprintln!(
                            "Error: Unknown digest algorithm '{}'. Supported: sha256, sha512",
                            value
                        );
                        std::process::exit(1);
                    }
                };
                i += 2;
            }
            "--max-record-len" => {
                let value = flag_value(&args, i, "a byte count");
                max_record_len = match value.parse::<usize>() {
                    Ok(n) if n > 0 => n,
                    _ => {
                        eprintln!(
                            "Error: --max-record-len requires a positive integer, got '{}'",
                            value
                        );
                        std::process::exit(1);
                    }
                };
                i += 2;
            }
            arg if arg.starts_with("--") => {
                eprintln!("Error: Unknown option '{}'", arg);
                std::process::exit(1);
            }
            arg => {
                positional.push(arg);
                i += 1;
            }
        }
    }

    if positional.is_empty() {
        eprintln!("Usage: line-sieve [OPTIONS] <input-file> [output-file]");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  <input-file>    Path to the input file (or - for stdin)");
        eprintln!("  [output-file]   Optional output file (defaults to stdout)");
        eprintln!();
        eprintln!("Options:");
        eprintln!("  --allow <file>           Keep only lines listed in the file (one per line)");
        eprintln!("  --block <file>           Drop lines listed in the file (one per line)");
        eprintln!("  --keep-containing <str>  Keep only lines containing the substring");
        eprintln!("  --drop-containing <str>  Drop lines containing the substring");
        eprintln!("  --raw                    Write the filtered lines without compression");
        eprintln!("  --entry-name <name>      Entry name recorded in the archive (defaults to the input file name)");
        eprintln!("  --digest <algorithm>     Compute checksum of the written output (sha256, sha512)");
        eprintln!(
            "  --max-record-len <n>     Maximum line length in bytes (default {})",
            DEFAULT_MAX_RECORD_LEN
        );
        eprintln!();
        eprintln!("Examples:");
        eprintln!("  line-sieve app.log app.log.gz                          # Compress all lines");
        eprintln!("  line-sieve --drop-containing DEBUG app.log app.log.gz  # Drop debug lines");
        eprintln!("  line-sieve --allow allowlist.txt records.txt out.gz    # Keep allowlisted lines");
        eprintln!("  line-sieve --raw --block blocklist.txt records.txt     # Filtered lines to stdout");
        eprintln!("  line-sieve --digest sha256 app.log app.log.gz          # Checksum the archive");
        eprintln!("  curl https://example.com/app.log | line-sieve --drop-containing TRACE - app.log.gz");
        std::process::exit(1);
    }

    let input_file = positional[0];
    let output_file = positional.get(1).copied();

    if (allowlist_file.is_some() || blocklist_file.is_some())
        && (keep_containing.is_some() || drop_containing.is_some())
    {
        eprintln!("Error: --allow/--block cannot be combined with --keep-containing/--drop-containing");
        std::process::exit(1);
    }
    if keep_containing.is_some() && drop_containing.is_some() {
        eprintln!("Error: --keep-containing cannot be combined with --drop-containing");
        std::process::exit(1);
    }

    // Read filter lists if specified
    let allowlist_owned = allowlist_file.map(read_line_list).transpose()?;
    let blocklist_owned = blocklist_file.map(read_line_list).transpose()?;

    // If both allow and block are specified, preprocess by removing blocked
    // lines from the allowlist; this reduces to a single Allow set at runtime
    let list_owned: Option<FxHashSet<Vec<u8>>> = match (allowlist_owned, blocklist_owned) {
        (Some(mut allow), Some(block)) => {
            let original_count = allow.len();
            allow.retain(|line| !block.contains(line));
            eprintln!(
                "Loaded {} lines from allowlist, {} from blocklist ({} after removing blocked)",
                original_count,
                block.len(),
                allow.len()
            );
            Some(allow)
        }
        (Some(allow), None) => {
            eprintln!("Loaded {} lines from allowlist", allow.len());
            Some(allow)
        }
        (None, Some(block)) => {
            eprintln!("Loaded {} lines from blocklist", block.len());
            Some(block)
        }
        (None, None) => None,
    };

    let mode = if let Some(list) = &list_owned {
        if allowlist_file.is_some() {
            FilterMode::Allow(list)
        } else {
            FilterMode::Block(list)
        }
    } else if let Some(needle) = keep_containing {
        FilterMode::KeepContaining(needle.as_bytes())
    } else if let Some(needle) = drop_containing {
        FilterMode::DropContaining(needle.as_bytes())
    } else {
        FilterMode::Passthrough
    };

    // Entry name recorded in the archive header
    let entry_name = match entry_name {
        Some(name) => name.to_string(),
        None if input_file == "-" => "filtered.txt".to_string(),
        None => Path::new(input_file)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "filtered.txt".to_string()),
    };

    // Open input
    let input: Box<dyn Read + Send> = if input_file == "-" {
        Box::new(io::stdin())
    } else {
        Box::new(File::open(input_file)?)
    };

    // Stream and filter
    let digest = if let Some(output_path) = output_file {
        let mut output = File::create(output_path)?;
        let digest = if raw {
            filter_lines_streaming(input, &mut output, mode, digest_algorithm, max_record_len)?
        } else {
            filter_to_archive(
                input,
                &mut output,
                mode,
                &entry_name,
                digest_algorithm,
                max_record_len,
            )?
        };
        eprintln!("Written to {}", output_path);
        digest
    } else {
        let mut output = io::stdout();
        if raw {
            filter_lines_streaming(input, &mut output, mode, digest_algorithm, max_record_len)?
        } else {
            filter_to_archive(
                input,
                &mut output,
                mode,
                &entry_name,
                digest_algorithm,
                max_record_len,
            )?
        }
    };

    if let Some(checksum) = digest {
        eprintln!("{}: {}", digest_algorithm.unwrap().name(), checksum);
    }

    Ok(())
}

/// Fetch the value following a flag, or exit with a usage error
fn flag_value<'a>(args: &'a [String], i: usize, what: &str) -> &'a str {
    match args.get(i + 1) {
        Some(value) => value,
        None => {
            eprintln!("Error: {} requires {}", args[i], what);
            std::process::exit(1);
        }
    }
}

/// Read a line list from file (one line per entry, supports comments with #)
fn read_line_list(path: &str) -> io::Result<FxHashSet<Vec<u8>>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut lines = FxHashSet::default();

    for line in reader.lines() {
        let line = line?;
        let entry = line.trim();
        // Skip empty lines and comments
        if !entry.is_empty() && !entry.starts_with('#') {
            lines.insert(entry.as_bytes().to_vec());
        }
    }

    Ok(lines)
}
