//! Static port to service-name table, following the conventional names from
//! the IANA registry as shipped in `/etc/services`.

use crate::network::port::Protocol;

pub const UNKNOWN_SERVICE: &str = "Unknown Service";

// Sorted by port for binary search.
const TCP_SERVICES: &[(u16, &str)] = &[
    (7, "echo"),
    (9, "discard"),
    (13, "daytime"),
    (20, "ftp-data"),
    (21, "ftp"),
    (22, "ssh"),
    (23, "telnet"),
    (25, "smtp"),
    (37, "time"),
    (43, "whois"),
    (53, "domain"),
    (70, "gopher"),
    (79, "finger"),
    (80, "http"),
    (88, "kerberos"),
    (110, "pop3"),
    (111, "sunrpc"),
    (113, "auth"),
    (119, "nntp"),
    (135, "epmap"),
    (139, "netbios-ssn"),
    (143, "imap2"),
    (161, "snmp"),
    (179, "bgp"),
    (389, "ldap"),
    (443, "https"),
    (445, "microsoft-ds"),
    (465, "submissions"),
    (513, "login"),
    (514, "shell"),
    (515, "printer"),
    (548, "afpovertcp"),
    (554, "rtsp"),
    (587, "submission"),
    (631, "ipp"),
    (636, "ldaps"),
    (873, "rsync"),
    (990, "ftps"),
    (993, "imaps"),
    (995, "pop3s"),
    (1080, "socks"),
    (1194, "openvpn"),
    (1433, "ms-sql-s"),
    (1723, "pptp"),
    (1883, "mqtt"),
    (2049, "nfs"),
    (2375, "docker"),
    (3306, "mysql"),
    (3389, "ms-wbt-server"),
    (3690, "svn"),
    (5060, "sip"),
    (5432, "postgresql"),
    (5672, "amqp"),
    (5900, "rfb"),
    (6379, "redis"),
    (6667, "ircd"),
    (8080, "http-alt"),
    (8443, "https-alt"),
    (9418, "git"),
    (11211, "memcache"),
    (27017, "mongodb"),
];

/// Conventional service bound to `port`, if the table knows one.
pub fn lookup(port: u16, protocol: Protocol) -> Option<&'static str> {
    let table = match protocol {
        Protocol::Tcp => TCP_SERVICES,
    };

    table
        .binary_search_by_key(&port, |&(p, _)| p)
        .ok()
        .map(|idx| table[idx].1)
}

/// Like [`lookup`], with [`UNKNOWN_SERVICE`] for ports the table does not know.
pub fn service_name(port: u16, protocol: Protocol) -> &'static str {
    lookup(port, protocol).unwrap_or(UNKNOWN_SERVICE)
}
