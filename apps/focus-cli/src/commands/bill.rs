// bill.rs — Bill subcommands: show, verify.

use std::path::PathBuf;

use clap::Subcommand;
use focus_bill::BillStore;
use focus_core::ArtifactCoordinate;

#[derive(Subcommand)]
pub enum BillCommands {
    /// Print the bill's coordinates, deduplicated and sorted.
    Show {
        /// Path to the bill (usually target/recording.txt).
        file: PathBuf,
    },
    /// Check that the bill is well formed, sorted and unique.
    Verify {
        /// Path to the bill (usually target/recording.txt).
        file: PathBuf,
    },
}

pub fn execute(cmd: &BillCommands) -> anyhow::Result<()> {
    match cmd {
        BillCommands::Show { file } => {
            if !file.exists() {
                println!("No bill found at {}", file.display());
                return Ok(());
            }
            let entries = BillStore::new(file).read_lines()?;
            for entry in &entries {
                println!("{}", entry);
            }
            println!();
            println!("{} distinct artifact(s)", entries.len());
        }

        BillCommands::Verify { file } => {
            if !file.exists() {
                anyhow::bail!("No bill found at {}", file.display());
            }
            let store = BillStore::new(file);
            let problems = layout_problems(&store.raw_lines()?);
            if !problems.is_empty() {
                println!("Bill {} has {} problem(s):", file.display(), problems.len());
                for problem in &problems {
                    println!("  {}", problem);
                }
                anyhow::bail!("Bill verification failed");
            }
            println!(
                "Bill verified: {} artifact(s), sorted and unique.",
                store.read_lines()?.len()
            );
            println!("sha256: {}", store.digest()?);
        }
    }

    Ok(())
}

/// Every way `lines` deviates from a bill the recorder would write.
fn layout_problems(lines: &[String]) -> Vec<String> {
    let mut problems = Vec::new();
    let mut previous: Option<&str> = None;

    for (i, line) in lines.iter().enumerate() {
        let n = i + 1;
        if line.trim().is_empty() {
            problems.push(format!("line {}: blank line", n));
            continue;
        }
        match line.parse::<ArtifactCoordinate>() {
            Ok(coordinate) => {
                let canonical = coordinate.to_string();
                if &canonical != line {
                    problems.push(format!(
                        "line {}: '{}' is not canonical (expected '{}')",
                        n, line, canonical
                    ));
                }
            }
            Err(e) => problems.push(format!("line {}: {}", n, e)),
        }
        if let Some(prev) = previous {
            if prev == line.as_str() {
                problems.push(format!("line {}: duplicate of line {}", n, n - 1));
            } else if prev > line.as_str() {
                problems.push(format!("line {}: out of order", n));
            }
        }
        previous = Some(line);
    }
    problems
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn recorder_output_has_no_problems() {
        let bill = lines(&["com.acme:lib:jar:1.0", "com.acme:other:jar:2.0", "org.x:y:jar:tests:3"]);
        assert!(layout_problems(&bill).is_empty());
    }

    #[test]
    fn flags_unsorted_duplicate_and_malformed_lines() {
        let bill = lines(&["b:b:jar:1", "a:a:jar:1", "a:a:jar:1", "nonsense", ""]);
        let problems = layout_problems(&bill);
        assert_eq!(problems.len(), 4);
        assert!(problems[0].starts_with("line 2: out of order"));
        assert!(problems[1].starts_with("line 3: duplicate"));
        assert!(problems[2].starts_with("line 4:"));
        assert_eq!(problems[3], "line 5: blank line");
    }

    #[test]
    fn short_form_is_not_canonical() {
        let problems = layout_problems(&lines(&["org.x:y:1.0"]));
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("org.x:y:jar:1.0"));
    }
}
