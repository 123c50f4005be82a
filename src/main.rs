use std::path::Path;

use thesis_tools::{
    aggregate, analyze_sources, discover_sources, export_json, export_xlsx, load_config, log_event,
    render_console_report, ExportError,
};

fn main() {
    // 1) Read optional run file
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

    println!("Counting thesis words...");

    // 2) Discover entry file + chapter files
    let discovery = match discover_sources(&cfg.project_root(), &cfg.entry_file, &cfg.chapters_dir, cfg.extension()) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Cannot analyze project: {}", e);
            log_event(serde_json::json!({
                "tool": "discover_sources",
                "root": cfg.project_root,
                "error": e.to_string()
            }));
            std::process::exit(2);
        }
    };
    for f in &discovery.failures {
        eprintln!("Error reading {}: {}", f.path, f.message);
        log_event(serde_json::json!({
            "tool": "discover_sources",
            "file": f.path,
            "error": f.message
        }));
    }
    println!("Found {} .{} files", discovery.sources.len(), cfg.extension());
    log_event(serde_json::json!({
        "tool": "discover_sources",
        "count": discovery.sources.len(),
        "failed": discovery.failures.len()
    }));

    // 3) Strip + classify each file, then fold
    let records = analyze_sources(&discovery.sources);
    for rec in &records {
        println!("Processed: {} ({})", rec.file_path, rec.chapter_name);
        log_event(serde_json::json!({
            "tool": "process_chapter",
            "file": rec.file_path,
            "chapter": rec.chapter_name,
            "total_words": rec.total_words
        }));
    }
    let report = aggregate(records);

    print!("{}", render_console_report(&report));

    // 4) Exports are independent of each other
    let json_path = Path::new(&cfg.json_report);
    match export_json(&report, json_path) {
        Ok(()) => println!("Report written to: {}", json_path.display()),
        Err(e) => {
            eprintln!("Failed to write report {}: {}", json_path.display(), e);
            log_event(serde_json::json!({"tool": "export_json", "file": cfg.json_report, "error": e.to_string()}));
        }
    }

    let xlsx_path = Path::new(&cfg.xlsx_report);
    match export_xlsx(&report, xlsx_path) {
        Ok(()) => println!("Spreadsheet written to: {}", xlsx_path.display()),
        Err(ExportError::Locked(p)) => {
            eprintln!("Warning: cannot write spreadsheet {} (it may be open in another program)", p);
            eprintln!("   Close the file and run again");
            log_event(serde_json::json!({"tool": "export_xlsx", "file": p, "status": "locked"}));
        }
        Err(e) => {
            eprintln!("Warning: spreadsheet export failed: {}", e);
            log_event(serde_json::json!({"tool": "export_xlsx", "file": cfg.xlsx_report, "error": e.to_string()}));
        }
    }

    println!("\nDone!");
}
