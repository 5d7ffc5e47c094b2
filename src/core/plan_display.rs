// src/core/plan_display.rs

use colored::Colorize;

use crate::models::Invocation;

/// Displays an ASCII tree of a resolved invocation and its flattened plan.
pub fn display_plan(invocation: &Invocation) {
    match invocation {
        Invocation::Script(script) => {
            println!("{} [{}]", script.name, script.scope);
        }
        Invocation::Alias(alias) => {
            println!("{} [{}]", alias.name.bold(), alias.scope);
            for (i, child) in alias.scripts.iter().enumerate() {
                let is_last = i == alias.scripts.len() - 1;
                print_node(child, "", is_last);
            }
            if !alias.ad_hoc_props.is_empty() {
                println!("\nAd-hoc properties (in effect order):");
                for prop in &alias.ad_hoc_props {
                    println!("  -P{}", prop);
                }
            }
        }
    }

    println!("\nExecution plan:");
    for (i, script) in invocation.flatten().iter().enumerate() {
        let rendered = if script.arguments.is_empty() {
            script.name.clone()
        } else {
            format!("{} {}", script.name, script.arguments.join(" "))
        };
        println!("  {}. {} [{}]", i + 1, rendered, script.scope.to_string().dimmed());
    }
}

/// Recursive function to print a tree node and its descendants.
fn print_node(invocation: &Invocation, prefix: &str, is_last: bool) {
    let connector = if is_last { "└─" } else { "├─" };

    match invocation {
        Invocation::Script(script) => {
            let args = if script.arguments.is_empty() {
                String::new()
            } else {
                format!(" {}", script.arguments.join(" "))
            };
            println!(
                "{}{} {}{} [{}]",
                prefix,
                connector,
                script.name,
                args,
                script.scope.to_string().dimmed()
            );
        }
        Invocation::Alias(alias) => {
            println!(
                "{}{} {} [{}]",
                prefix,
                connector,
                alias.name.bold(),
                alias.scope.to_string().dimmed()
            );
            let child_prefix = format!("{}{}", prefix, if is_last { "   " } else { "│  " });
            for (i, child) in alias.scripts.iter().enumerate() {
                let is_last_child = i == alias.scripts.len() - 1;
                print_node(child, &child_prefix, is_last_child);
            }
        }
    }
}
