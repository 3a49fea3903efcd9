//! List rules command implementation.

use sniff_rules::all_rules;

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!("{:<10} {:<25} {:<10} Description", "Code", "Name", "Severity");
    println!("{}", "-".repeat(80));

    for rule in all_rules() {
        println!(
            "{:<10} {:<25} {:<10} {}",
            rule.code(),
            rule.name(),
            rule.default_severity().to_string(),
            rule.description()
        );
    }

    println!("\nUse --rules to run only some rules, e.g.:");
    println!("  sniff check --rules use-elseif");
    println!("  sniff check --rules SN001");
}
