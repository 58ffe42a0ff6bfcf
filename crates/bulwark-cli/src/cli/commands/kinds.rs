//! `bulwark kinds` – list the policy kinds.

use bulwark_core::PolicyKind;

pub fn run_kinds() {
    println!("{:<4} {:<16} {}", "NO", "KIND", "DESCRIPTION");
    for kind in PolicyKind::ALL {
        println!("{:<4} {:<16} {}", kind.number(), kind.name(), kind.description());
    }
}
