use calvin_reader::CalvinReader;
use std::env;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <path-to-calvin-file>", args[0]);
        std::process::exit(1);
    }

    let path = &args[1];
    println!("Reading Calvin file: {}", path);
    println!("{}", "=".repeat(60));

    let reader = match CalvinReader::open(path) {
        Ok(reader) => reader,
        Err(e) => {
            eprintln!("\nERROR: Failed to read Calvin file");
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    };

    println!("\nFile Information:");
    println!("  Data type: {}", reader.header.uid.as_deref().unwrap_or("-"));
    println!("  Created: {}", reader.header.timestamp.as_deref().unwrap_or("-"));
    println!("  Array ID: {}", reader.array_id().unwrap_or("-"));
    println!("  Barcode: {}", reader.barcode().unwrap_or("-"));
    println!("  Parent headers: {}", reader.parents.len());

    let file = match reader.into_file() {
        Ok(file) => file,
        Err(e) => {
            eprintln!("\nERROR: Failed to decode data groups");
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    };

    println!("\nData Groups ({}):", file.groups.len());
    for group in &file.groups {
        println!("  {}", group.name);
        for data_set in &group.data_sets {
            println!(
                "    {} [{} rows x {} columns]",
                data_set.name,
                data_set.row_count,
                data_set.columns.len()
            );
        }
    }

    if !file.diagnostics.is_empty() {
        println!("\nDiagnostics:");
        for diagnostic in &file.diagnostics {
            println!("  {}", diagnostic);
        }
    }
}
