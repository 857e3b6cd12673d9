//! End-to-end tests against a fake hub over real HTTP.

mod common;

use std::net::Ipv4Addr;
use std::time::Duration;

use async_hub3::client::AUTH_USERNAME_OID;
use async_hub3::{
    Attribute, AttributeValue, Client, DataType, Error, IpAddress, IpProtocol, NewPortForward,
    PortRange, ReqwestTransport, attribute,
};
use common::*;

async fn logged_in(hub: &FakeHub) -> Client<ReqwestTransport> {
    Client::builder(hub.host())
        .timeout(Duration::from_secs(5))
        .backoff_unit(Duration::from_millis(1))
        .credentials(Some(USERNAME), PASSWORD)
        .connect()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_login_discovers_username() {
    let hub = FakeHub::start().await;
    let client = Client::builder(hub.host())
        .credentials(None, PASSWORD)
        .connect()
        .await
        .unwrap();

    assert!(client.is_logged_in());
    assert_eq!(client.username(), Some(USERNAME));
    assert_eq!(client.model_name(), Some("TG2492"));
    assert_eq!(client.family(), Some("Hub3"));

    let seen = hub.seen();
    assert_eq!(seen[0].path, "snmpGet");
    assert!(seen[0].query.starts_with(&format!("oids={};&_n=", AUTH_USERNAME_OID)));
    assert!(seen[0].cookie.is_none());
    assert_eq!(seen[1].path, "login");

    client.close().await.unwrap();
    assert!(!hub.is_logged_in());
    assert_eq!(hub.paths(), vec!["snmpGet", "login", "logout"]);
}

#[tokio::test]
async fn test_wrong_password() {
    let hub = FakeHub::start().await;
    let err = Client::builder(hub.host())
        .credentials(Some(USERNAME), "wrong")
        .connect()
        .await
        .unwrap_err();

    assert!(matches!(err, Error::LoginFailed { .. }));
    assert!(err.is_auth());
    assert_eq!(hub.logins(), 0);
}

#[tokio::test]
async fn test_get_many_and_missing() {
    let hub = FakeHub::start().await;
    let mut client = logged_in(&hub).await;

    let values = client
        .snmp_get_many(&[SERIAL_NUMBER, WAN_MTU, "1.3.6.1.4.1.4115.99.0"])
        .await
        .unwrap();
    assert_eq!(values.len(), 2);
    assert_eq!(values[SERIAL_NUMBER], "ABC123456789");
    assert_eq!(values[WAN_MTU], "1500");

    let err = client.snmp_get("1.3.6.1.4.1.4115.99.0").await.unwrap_err();
    assert!(matches!(err, Error::MissingOid { .. }));

    let seen = hub.seen();
    let get = seen.iter().find(|r| r.path == "snmpGet").unwrap();
    assert!(get.cookie.is_some());

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_set_apply_and_unchanged() {
    let hub = FakeHub::start().await;
    let mut client = logged_in(&hub).await;

    let changed = client
        .snmp_set(LAN_GATEWAY, Some("$c0a80101"), Some(DataType::OctetString))
        .await
        .unwrap();
    assert!(changed);
    assert_eq!(hub.value(LAN_GATEWAY).as_deref(), Some("$c0a80101"));
    assert!(client.has_unapplied_settings());

    // Same value again is HTTP 304
    let changed = client
        .snmp_set(LAN_GATEWAY, Some("$c0a80101"), Some(DataType::OctetString))
        .await
        .unwrap();
    assert!(!changed);

    client.apply_settings().await.unwrap();
    assert!(!client.has_unapplied_settings());
    assert_eq!(
        hub.value(async_hub3::client::COMMIT_OID).as_deref(),
        Some("1")
    );

    let set = hub.seen().into_iter().find(|r| r.path == "snmpSet").unwrap();
    assert!(set.query.starts_with(&format!("oid={}=%24c0a80101;4;&_n=", LAN_GATEWAY)));

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_walk_ignores_formatting_noise() {
    let hub = FakeHub::start().await;
    hub.set_walk_noise(true);
    let mut client = logged_in(&hub).await;

    let walk = client.snmp_walk(DNS_TABLE).await.unwrap();
    assert_eq!(walk.len(), 4);
    assert!(!walk.contains_key("1"));
    assert_eq!(walk[&format!("{}.3.2", DNS_TABLE)], "$08080404");

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_relogin_after_session_expiry() {
    let hub = FakeHub::start().await;
    let mut client = logged_in(&hub).await;
    hub.expire_session();

    let serial = client.snmp_get(SERIAL_NUMBER).await.unwrap();
    assert_eq!(serial, "ABC123456789");
    assert_eq!(hub.logins(), 2);
    assert_eq!(client.stats().counter("retries_401"), 1);
    assert_eq!(client.stats().counter("received_http_401"), 1);
    assert_eq!(
        hub.paths(),
        vec!["login", "snmpGet", "login", "snmpGet"]
    );

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_relogin_budget_exhausted() {
    let hub = FakeHub::start().await;
    let mut client = Client::builder(hub.host())
        .retry_401(1)
        .credentials(Some(USERNAME), PASSWORD)
        .connect()
        .await
        .unwrap();
    hub.set_forget_sessions(true);
    hub.expire_session();

    let err = client.snmp_get(SERIAL_NUMBER).await.unwrap_err();
    assert!(matches!(err, Error::AccessDenied { .. }));
    assert_eq!(client.stats().counter("retries_401"), 1);
    assert_eq!(hub.logins(), 2);
}

#[tokio::test]
async fn test_http_500_backoff() {
    let hub = FakeHub::start().await;
    let mut client = logged_in(&hub).await;
    hub.push_statuses(&[500, 500]);

    let mtu = client.snmp_get(WAN_MTU).await.unwrap();
    assert_eq!(mtu, "1500");
    assert_eq!(client.stats().counter("retries_500"), 2);
    assert_eq!(client.stats().backoff(), Duration::from_millis(3));

    hub.push_statuses(&[500, 500, 500, 500]);
    let err = client.snmp_get(WAN_MTU).await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert!(matches!(err, Error::Transport { .. }));
}

#[tokio::test]
async fn test_unexpected_status_is_not_retried() {
    let hub = FakeHub::start().await;
    let mut client = logged_in(&hub).await;
    hub.push_statuses(&[404]);

    let err = client.snmp_walk(DNS_TABLE).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(hub.paths().iter().filter(|p| *p == "walk").count(), 1);
}

#[tokio::test]
async fn test_lan_ip_address_without_login() {
    let hub = FakeHub::start().await;
    let mut client = Client::builder(hub.host()).connect().await.unwrap();

    assert_eq!(client.lan_ip_address().await.unwrap(), "192.168.0.1");
    assert!(hub.seen()[0].cookie.is_none());
}

#[tokio::test]
async fn test_connection_refused() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut client = Client::builder(addr.to_string()).connect().await.unwrap();
    let err = client.lan_ip_address().await.unwrap_err();
    assert!(matches!(err, Error::Network { .. }));
}

#[tokio::test]
async fn test_request_timeout() {
    let hub = FakeHub::start().await;
    hub.set_hang(true);
    let mut client = Client::builder(hub.host())
        .timeout(Duration::from_millis(200))
        .connect()
        .await
        .unwrap();

    let err = client.lan_ip_address().await.unwrap_err();
    assert!(matches!(err, Error::Network { .. }));
}

#[tokio::test]
async fn test_drop_logs_out() {
    let hub = FakeHub::start().await;
    let client = logged_in(&hub).await;
    assert!(hub.is_logged_in());
    drop(client);

    for _ in 0..100 {
        if !hub.is_logged_in() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(!hub.is_logged_in());
}

#[tokio::test]
async fn test_attributes() {
    let hub = FakeHub::start().await;
    let mut client = logged_in(&hub).await;

    let wanted: Vec<&Attribute> = ["serial_number", "wan_mtu_size", "current_time", "name"]
        .iter()
        .map(|n| attribute::lookup(n).unwrap())
        .collect();
    let values = client.read_attributes(&wanted).await.unwrap();
    assert_eq!(
        values[0],
        ("serial_number", Some(AttributeValue::String("ABC123456789".into())))
    );
    assert_eq!(values[1], ("wan_mtu_size", Some(AttributeValue::Integer(1500))));
    assert_eq!(
        values[2].1.as_ref().map(ToString::to_string).as_deref(),
        Some("2018-03-14T16:07:17")
    );
    assert_eq!(values[3], ("name", None));

    let gateway = attribute::lookup("lan_gateway_ipv4").unwrap();
    client
        .write_attribute(gateway, &AttributeValue::Ipv4(Ipv4Addr::new(10, 0, 0, 1)))
        .await
        .unwrap();
    assert_eq!(
        client.read_attribute(gateway).await.unwrap(),
        Some(AttributeValue::Ipv4(Ipv4Addr::new(10, 0, 0, 1)))
    );

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_dns_servers() {
    let hub = FakeHub::start().await;
    let mut client = logged_in(&hub).await;

    let servers = client.dns_servers().await.unwrap();
    assert_eq!(
        servers,
        vec![
            IpAddress::V4(Ipv4Addr::new(194, 168, 0, 1)),
            IpAddress::V4(Ipv4Addr::new(8, 8, 4, 4)),
        ]
    );
    assert!(client.wan_networks().await.unwrap().is_empty());

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_port_forward_lifecycle() {
    let hub = FakeHub::start().await;
    let mut client = logged_in(&hub).await;

    let rules = client.port_forwards().await.unwrap();
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0].to_string(), "tcp 2222 -> 192.168.0.10:22");
    assert_eq!(rules[0].description.as_deref(), Some("ssh"));

    let index = client
        .add_port_forward(&NewPortForward {
            protocol: IpProtocol::Udp,
            ext_ports: PortRange::new(5000, 5010),
            local_addr: Ipv4Addr::new(192, 168, 0, 11),
            local_ports: PortRange::new(6000, 6010),
        })
        .await
        .unwrap();
    assert_eq!(index, 2);
    assert!(!client.has_unapplied_settings());
    assert_eq!(
        hub.value(&format!("{}.7.2", PORT_FORWARD_TABLE)).as_deref(),
        Some("$C0A8000B")
    );

    let rules = client.port_forwards().await.unwrap();
    assert_eq!(rules.len(), 2);
    assert_eq!(rules[1].to_string(), "udp 5000-5010 -> 192.168.0.11:6000-6010");
    assert!(rules[1].enabled);

    let removed = client
        .remove_port_forward(IpProtocol::Tcp, PortRange::single(2222))
        .await
        .unwrap();
    assert_eq!(removed, 1);
    let rules = client.port_forwards().await.unwrap();
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0].index, 2);

    // No match still applies and removes nothing
    let removed = client
        .remove_port_forward(IpProtocol::Tcp, PortRange::single(2222))
        .await
        .unwrap();
    assert_eq!(removed, 0);

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_devices() {
    let hub = FakeHub::start().await;
    let mut client = logged_in(&hub).await;

    let devices = client.devices().await.unwrap();
    assert_eq!(devices.len(), 2);
    assert_eq!(devices[0].to_string(), "192.168.0.10 (78:7b:8a:64:13:f5)");

    let laptop = devices[0].ipv4;
    let other = devices[1].ipv4;
    assert!(client.device_connected(laptop).await.unwrap());
    assert!(!client.device_connected(other).await.unwrap());
    assert_eq!(client.device_name(laptop).await.unwrap().as_deref(), Some("laptop"));
    assert_eq!(client.device_name(other).await.unwrap(), None);

    assert_eq!(client.device(other).await.unwrap(), Some(devices[1]));
    assert_eq!(
        client.device(Ipv4Addr::new(192, 168, 0, 99)).await.unwrap(),
        None
    );

    client.close().await.unwrap();
}
