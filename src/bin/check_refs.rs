use std::path::Path;

use thesis_tools::refcheck::FileOutcome;
use thesis_tools::{collect_source_files, find_missing, load_config, log_event, read_bibliography, render_missing_report, scan_citations};

fn main() {
    let cfg = match load_config(Path::new(thesis_tools::CONFIG_FILE)) {
        Ok(c) => c,
        Err(e) => {
            log_event(serde_json::json!({
                "tool": "load_config",
                "file": thesis_tools::CONFIG_FILE,
                "error": e.to_string()
            }));
            std::process::exit(3);
        }
    };

    // 1) Defined keys; an unreadable bibliography ends the run
    let bib_path = cfg.bibliography_path();
    let defined = match read_bibliography(&bib_path) {
        Ok(keys) => keys,
        Err(e) => {
            eprintln!("Cannot open bibliography: {}", e);
            log_event(serde_json::json!({"tool": "load_keys", "file": bib_path, "error": e.to_string()}));
            std::process::exit(2);
        }
    };
    log_event(serde_json::json!({"tool": "load_keys", "file": bib_path, "count": defined.len()}));

    // 2) Source files under the citation root
    let files = match collect_source_files(&cfg.citation_root(), cfg.extension()) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Cannot scan sources: {}", e);
            log_event(serde_json::json!({"tool": "collect_source_files", "root": cfg.citation_root, "error": e.to_string()}));
            std::process::exit(2);
        }
    };

    // 3) Cited keys; unreadable files are reported and skipped
    let scan = scan_citations(&files);
    for outcome in &scan.outcomes {
        match outcome {
            FileOutcome::Checked(file) => println!("Checked: {}", file.display()),
            FileOutcome::Failed(f) => {
                println!("Error reading {}: {}", f.path, f.message);
                log_event(serde_json::json!({"tool": "extract_citations", "file": f.path, "error": f.message}));
            }
        }
    }

    let missing = find_missing(&scan.cited, &defined);
    log_event(serde_json::json!({
        "tool": "find_missing",
        "cited": scan.cited.len(),
        "defined": defined.len(),
        "missing": missing.len()
    }));
    print!("{}", render_missing_report(&scan.cited, &defined, &missing));
}
