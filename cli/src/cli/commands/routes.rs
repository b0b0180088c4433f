use ai_proxy_core::proxy::RouteTable;

pub fn run() {
    let routes = RouteTable::builtin();

    println!("{:<22} {:<45} {:<20}", "PREFIX", "TARGET", "HOSTNAME");
    println!("{}", "-".repeat(87));

    for entry in routes.entries() {
        println!(
            "{:<22} {:<45} {:<20}",
            format!("/{}/", entry.path_segment()),
            entry.target(),
            entry.hostname().unwrap_or("-")
        );
    }
}
