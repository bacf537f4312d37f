use logger;

/// A payload shaped like a mailbox message, to check `{:?}` formatting.
#[derive(serde::Serialize, Debug)]
struct Ping {
    seq: u32,
}

macro_rules! expand_levels {
    ($($level:ident),+$(,)?) => {
        $(
            #[test]
            fn $level() {
                logger::$level!("Hello, world!");
                logger::$level!("Hello, {}!", "world");
                logger::$level!("Message {:?} for mailbox {}", Ping { seq: 1 }, "mailslot.100");
            }
        )*
    };
}

expand_levels!(trace, debug, info, warn, error,);

#[cfg(feature = "debug")]
#[test]
fn timestamp_is_rfc3339() {
    let now = logger::timestamp::now();
    assert!(now.contains('T'), "Unexpected timestamp: {now}");
}

/// Every level is reachable as an item at the root of the crate.
#[test]
fn import_from_root() {
    use logger::{debug, error, info, trace, warn};

    trace!("Imported {}", "trace");
    debug!("Imported {}", "debug");
    info!("Imported {}", "info");
    warn!("Imported {}", "warn");
    error!("Imported {}", "error");
}
