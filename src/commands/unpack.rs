use clap;
use std::path::Path;
use std::str::FromStr;
use crate::unpack::{FileUnpacker,UnpackOptions};
use crate::STDRESULT;

pub fn unpack(cmd: &clap::ArgMatches) -> STDRESULT {
    let filename = cmd.get_one::<String>("filename").expect("required arg");
    let destination = cmd.get_one::<String>("destination").expect("defaulted arg");
    let archive_limit = match cmd.get_one::<String>("archive-limit") {
        Some(s) => Some(u64::from_str(s)?),
        None => None
    };
    let opts = UnpackOptions {
        carve: cmd.get_flag("carve"),
        noextract: cmd.get_flag("noextract"),
        recurse: cmd.get_flag("recurse"),
        recurse_multifiles: cmd.get_flag("recurse-multifiles"),
        archive_limit
    };
    let unpacker = FileUnpacker::new(opts);
    unpacker.unpack_all(Path::new(filename),Path::new(destination))
}
