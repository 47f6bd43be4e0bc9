use clap;
use std::io::BufReader;
use std::path::Path;
use crate::hexrec::Reassembler;
use crate::STDRESULT;

pub fn hexbin(cmd: &clap::ArgMatches) -> STDRESULT {
    let filename = cmd.get_one::<String>("filename").expect("required arg");
    let destination = cmd.get_one::<String>("destination").expect("defaulted arg");
    let f = std::fs::File::open(filename)?;
    let mut reassembler = Reassembler::new();
    if let Err(e) = reassembler.feed(BufReader::new(f)) {
        log::error!("{}: {}",filename,e);
        return Err(Box::new(e));
    }
    reassembler.write_chunks(Path::new(destination))
}
