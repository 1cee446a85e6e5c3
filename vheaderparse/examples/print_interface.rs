use vheaderparse::ModuleHeader;
use std::env;

fn main() {
    clilog::init_stderr_color_debug();
    let args: Vec<String> = env::args().collect();
    assert!(args.len() == 2 || args.len() == 3,
            "Usage: {} <verilog_path> [<module>]", args[0]);
    clilog::info!("Verilog file {}", args[1]);

    let header = match ModuleHeader::parse_file(
        &args[1], args.get(2).map(|x| x.as_ref())
    ) {
        Ok(header) => header,
        Err(e) => panic!("{}", e)
    };

    println!("{}", header.interface);
    clilog::info!("# Ports = {}", header.interface.ports.len());
    clilog::info!("# Diagnostics = {}", header.diagnostics.len());
}
