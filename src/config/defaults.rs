//! Built-in defaults.

use std::time::Duration;

/// Default wall-clock budget for a whole check.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default I/O timeout for a single DNS lookup.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// File name looked up in the home directory when `--config` is not given.
pub const CONFIG_FILE_NAME: &str = ".dnsbl-check.yaml";

/// Blacklist zones queried when neither the config file nor the command
/// line names any.
pub const DEFAULT_BLACKLIST_SERVERS: &[&str] = &[
    "bl.spamcop.net",
    "cbl.abuseat.org",
    "b.barracudacentral.org",
    "dnsbl.sorbs.net",
    "http.dnsbl.sorbs.net",
    "dul.dnsbl.sorbs.net",
    "misc.dnsbl.sorbs.net",
    "smtp.dnsbl.sorbs.net",
    "socks.dnsbl.sorbs.net",
    "spam.dnsbl.sorbs.net",
    "web.dnsbl.sorbs.net",
    "zombie.dnsbl.sorbs.net",
    "dnsbl-1.uceprotect.net",
    "dnsbl-2.uceprotect.net",
    "dnsbl-3.uceprotect.net",
    "pbl.spamhaus.org",
    "sbl.spamhaus.org",
    "xbl.spamhaus.org",
    "zen.spamhaus.org",
    "psbl.surriel.com",
    "ubl.unsubscore.com",
    "dnsbl.njabl.org",
    "combined.njabl.org",
    "rbl.spamlab.com",
    "dyna.spamrats.com",
    "noptr.spamrats.com",
    "spam.spamrats.com",
    "cbl.anti-spam.org.cn",
    "cdl.anti-spam.org.cn",
    "dnsbl.inps.de",
    "drone.abuse.ch",
    "httpbl.abuse.ch",
    "korea.services.net",
    "short.rbl.jp",
    "virus.rbl.jp",
    "spamrbl.imp.ch",
    "wormrbl.imp.ch",
    "virbl.bit.nl",
    "dsn.rfc-ignorant.org",
    "ips.backscatterer.org",
    "spamguard.leadmon.net",
    "opm.tornevall.org",
    "netblock.pedantic.org",
    "multi.surbl.org",
    "ix.dnsbl.manitu.net",
    "tor.dan.me.uk",
    "relays.mail-abuse.org",
    "blackholes.mail-abuse.org",
    "rbl-plus.mail-abuse.org",
    "dnsbl.dronebl.org",
    "access.redhawk.org",
    "db.wpbl.info",
    "rbl.interserver.net",
    "query.senderbase.org",
    "bogons.cymru.com",
    "csi.cloudmark.com",
];
