// src/banner.rs

/// Prints the startup banner to stderr, keeping stdout for the roster.
pub fn print_banner() {
    let banner = r#"
  ____           _              _   _       _                 _
 |  _ \ ___  ___| |_ ___ _ __  | | | |_ __ | | ___   __ _  __| |
 | |_) / _ \/ __| __/ _ \ '__| | | | | '_ \| |/ _ \ / _` |/ _` |
 |  _ < (_) \__ \ ||  __/ |    | |_| | |_) | | (_) | (_| | (_| |
 |_| \_\___/|___/\__\___|_|     \___/| .__/|_|\___/ \__,_|\__,_|
                                     |_|

    BattleScribe Roster Formatter Client
"#;
    eprintln!("{}", banner);
}
