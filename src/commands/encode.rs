use clap;
use std::io::Write;
use crate::encode;
use crate::STDRESULT;

pub fn encode(cmd: &clap::ArgMatches) -> STDRESULT {
    let specs: Vec<&String> = cmd.get_many::<String>("spec").expect("required arg").collect();
    let on_terminal = atty::is(atty::Stream::Stdout);
    for spec in specs {
        let variants = match encode::encode_argument(spec) {
            Ok(variants) => variants,
            Err(e) => {
                log::error!("{}",e);
                return Err(Box::new(e));
            }
        };
        for variant in variants {
            if on_terminal {
                println!("{}:",variant.name);
                crate::display_block(0,&variant.data);
            } else {
                std::io::stdout().write_all(&variant.data)?;
            }
        }
    }
    if !on_terminal {
        std::io::stdout().flush()?;
    }
    Ok(())
}
