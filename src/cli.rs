use clap::{arg, crate_version, ArgAction, ArgGroup, Command, ValueHint};

pub fn build_cli() -> Command {
    let long_help = "fwkit is always invoked with exactly one of several subcommands.
Set RUST_LOG environment variable to control logging level.
  levels: trace,debug,info,warn,error

Examples:
---------
scan and extract:        `fwkit unpack firmware.bin`
carve without extract:   `fwkit unpack -c -n -d carved firmware.bin`
recursive unpack:        `fwkit unpack -r -d out firmware.bin`
decode a cramfs image:   `fwkit uncram -d rootfs cramfs.img`
rebuild hex firmware:    `fwkit hexbin -d chunks firmware.hex`
build a search needle:   `fwkit encode uint32:0x1234 | xxd`";

    let mut main_cmd = Command::new("fwkit")
        .about("Finds and extracts binary artifacts hidden in opaque files.")
        .after_long_help(long_help)
        .version(crate_version!());
    main_cmd = main_cmd.subcommand(
        Command::new("unpack")
            .arg(
                arg!(<filename> "file that should be attempted to unpack")
                    .value_hint(ValueHint::FilePath),
            )
            .arg(
                arg!(-d --destination <PATH> "output path")
                    .value_hint(ValueHint::DirPath)
                    .required(false)
                    .default_value("unpacked"),
            )
            .arg(arg!(-c --carve "carve out the raw source data of the found files").action(ArgAction::SetTrue))
            .arg(
                arg!(-n --noextract "do not extract contents of containers (e.g., found ZIP files are not unzipped)")
                    .action(ArgAction::SetTrue),
            )
            .arg(arg!(-r --recurse "recursively try to extract data").action(ArgAction::SetTrue))
            .group(
                ArgGroup::new("extraction")
                    .required(false)
                    .multiple(false)
                    .args(["noextract", "recurse"]),
            )
            .arg(
                arg!(--"recurse-multifiles" "also recurse through the contents of extracted multi-file trees")
                    .action(ArgAction::SetTrue),
            )
            .arg(
                arg!(-l --"archive-limit" <BYTES> "limit the bytes fed to inner archive decoders")
                    .required(false),
            )
            .arg(
                arg!(-v --verbose ... "be more verbose, can be specified multiple times")
                    .action(ArgAction::Count),
            )
            .about("scan a file for embedded artifacts, carve or extract them"),
    );
    main_cmd = main_cmd.subcommand(
        Command::new("uncram")
            .arg(
                arg!(<image> "cramfs image to decode")
                    .value_hint(ValueHint::FilePath),
            )
            .arg(
                arg!(-d --destination <PATH> "target directory")
                    .value_hint(ValueHint::DirPath)
                    .required(false)
                    .default_value("uncrammed"),
            )
            .about("extract a cramfs filesystem image"),
    );
    main_cmd = main_cmd.subcommand(
        Command::new("hexbin")
            .arg(
                arg!(<filename> "hex firmware file that should be extracted")
                    .value_hint(ValueHint::FilePath),
            )
            .arg(
                arg!(-d --destination <PATH> "output directory for chunk files")
                    .value_hint(ValueHint::DirPath)
                    .required(false)
                    .default_value("."),
            )
            .about("reassemble Intel-HEX records into binary chunk files"),
    );
    main_cmd = main_cmd.subcommand(
        Command::new("encode")
            .arg(
                arg!(<spec> ... "one or more TYPE:VALUE strings, e.g. uint16:1234 or str-u16-le:abc"),
            )
            .about("encode typed values into bytes, hex dump on a terminal, raw bytes when piped"),
    );
    main_cmd = main_cmd.subcommand(
        Command::new("completions")
            .arg(
                arg!(-s --shell <SHELL> "shell to generate completions for")
                    .required(true)
                    .value_parser(["bash", "elvish", "fish", "powershell", "zsh"]),
            )
            .about("write completions script to stdout"),
    );
    main_cmd
}
