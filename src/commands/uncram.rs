use clap;
use std::path::Path;
use crate::fs::cramfs::UncramFS;
use crate::STDRESULT;

pub fn uncram(cmd: &clap::ArgMatches) -> STDRESULT {
    let image = cmd.get_one::<String>("image").expect("required arg");
    let destination = cmd.get_one::<String>("destination").expect("defaulted arg");
    let f = std::fs::File::open(image)?;
    let mut ucfs = UncramFS::open(f)?;
    ucfs.uncram(Path::new(destination))
}
