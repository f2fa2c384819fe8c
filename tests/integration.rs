//! End-to-end tests against captured wire frames.
//!
//! Every capture here was taken from live tracker traffic; decode then
//! re-encode must reproduce the original text byte for byte (except
//! where decoding canonicalizes argument keys, which is asserted
//! explicitly).

use trackwire::{
    ArgValue, FirmwareBranch, Packet, ProtocolError, frame,
};

const TS_CAPTURE: &str = "<Ts>1735689600;123e4567-e89b-12d3-a456-426614174000;696E</Ts>";
const TE_CAPTURE: &str = "<Te>1735689600;123e4567-e89b-12d3-a456-426614174000;696E</Te>";
const PA_CAPTURE: &str = "<Pa>phkenny123;;2664</Pa>";
const PR_CAPTURE: &str = "<Pr>;7F28</Pr>";
const AB_CAPTURE: &str = "<Ab>000000000000:MODEL1;000000000001:MODEL2;7DA8</Ab>";
const AC_CAPTURE: &str =
    "<Ac>1;set_config;int:1234,float:12.34,bool:true,string:test;6C56;815F</Ac>";
const PC_CAPTURE: &str = "<Pc>1739998848;1919;Cannot sniff in foreground;7DCB</Pc>";
const PI_CAPTURE: &str = "<Pi>744DBD89B0D9;layrz.hub12.base;49;22246;1;460;0;false;2586</Pi>";
const PS_CAPTURE: &str = "<Ps>1739998822;configuration.distance.filter.meters:5,\
configuration.frequency.update.seconds:20,configuration.accuracy:best,\
configuration.server:development,configuration.sniff.interval:30,\
configuration.sniff.cooldown:30;BD6B</Ps>";
const PB_CAPTURE: &str = "<Pb>1C9DC2691436;1740000984;19.4346059;-99.1802234;\
2240.800048828125;GENERIC;Core200S;-60;;06D0:01361469C29D1CC623020202;;6FF6;4FBD</Pb>";
const PD_CAPTURE: &str = "<Pd>1740081532;;;;;;;;report.code:LKSEN,fw.build:49,wifi.rssi:-61,\
cpu.temperature:43,io1.di:0,io2.di:0,io5.di:0,io6.di:0,io7.di:0,io14.di:0,io45.di:0,\
io46.di:0,io47.di:0;1ACF</Pd>";

fn assert_byte_exact(capture: &str) -> Packet {
    let packet = Packet::decode(capture).unwrap();
    assert_eq!(packet.encode().unwrap(), capture);
    packet
}

#[test]
fn test_trip_captures_byte_exact() {
    let ts = assert_byte_exact(TS_CAPTURE);
    let te = assert_byte_exact(TE_CAPTURE);
    assert_eq!(ts.tag(), "Ts");
    assert_eq!(te.tag(), "Te");
}

#[test]
fn test_pa_capture_preserves_empty_password() {
    let Packet::Pa(pa) = assert_byte_exact(PA_CAPTURE) else {
        panic!("expected Pa");
    };
    assert_eq!(pa.ident, "phkenny123");
    assert_eq!(pa.password, "");
}

#[test]
fn test_pr_capture_has_no_fields() {
    assert!(matches!(assert_byte_exact(PR_CAPTURE), Packet::Pr(_)));
}

#[test]
fn test_ab_capture() {
    let Packet::Ab(ab) = assert_byte_exact(AB_CAPTURE) else {
        panic!("expected Ab");
    };
    assert_eq!(ab.devices.len(), 2);
    assert_eq!(ab.devices[0].mac_address, "00:00:00:00:00:00");
    assert_eq!(ab.devices[0].model, "MODEL1");
    assert_eq!(ab.devices[1].mac_address, "00:00:00:00:00:01");
    assert_eq!(ab.devices[1].model, "MODEL2");
}

#[test]
fn test_ac_capture() {
    let Packet::Ac(ac) = assert_byte_exact(AC_CAPTURE) else {
        panic!("expected Ac");
    };
    assert_eq!(ac.commands.len(), 1);
    let command = &ac.commands[0];
    assert_eq!(command.command_id, 1);
    assert_eq!(command.name, "set_config");
    assert_eq!(command.args.get("int"), Some(&ArgValue::Int(1234)));
    assert_eq!(command.args.get("float"), Some(&ArgValue::Float(12.34)));
    assert_eq!(command.args.get("bool"), Some(&ArgValue::Bool(true)));
    assert_eq!(
        command.args.get("string"),
        Some(&ArgValue::Text("test".into()))
    );
}

#[test]
fn test_pc_capture_allows_spaces_in_message() {
    let Packet::Pc(pc) = assert_byte_exact(PC_CAPTURE) else {
        panic!("expected Pc");
    };
    assert_eq!(pc.timestamp.timestamp(), 1_739_998_848);
    assert_eq!(pc.command_id, 1919);
    assert_eq!(pc.message, "Cannot sniff in foreground");
}

#[test]
fn test_pi_capture() {
    let Packet::Pi(pi) = assert_byte_exact(PI_CAPTURE) else {
        panic!("expected Pi");
    };
    assert_eq!(pi.ident, "744DBD89B0D9");
    assert_eq!(pi.firmware_id, "layrz.hub12.base");
    assert_eq!(pi.firmware_build, 49);
    assert_eq!(pi.device_id, 22246);
    assert_eq!(pi.hardware_id, 1);
    assert_eq!(pi.model_id, 460);
    assert_eq!(pi.firmware_branch, FirmwareBranch::Stable);
    assert!(!pi.fota_enabled);
}

#[test]
fn test_ps_capture() {
    let Packet::Ps(ps) = assert_byte_exact(PS_CAPTURE) else {
        panic!("expected Ps");
    };
    assert_eq!(ps.timestamp.timestamp(), 1_739_998_822);
    assert_eq!(ps.params.len(), 6);
    assert_eq!(
        ps.params.get("configuration.distance.filter.meters"),
        Some(&ArgValue::Int(5))
    );
    assert_eq!(
        ps.params.get("configuration.accuracy"),
        Some(&ArgValue::Text("best".into()))
    );
    assert_eq!(
        ps.params.get("configuration.server"),
        Some(&ArgValue::Text("development".into()))
    );
}

#[test]
fn test_pb_capture() {
    let Packet::Pb(pb) = assert_byte_exact(PB_CAPTURE) else {
        panic!("expected Pb");
    };
    assert_eq!(pb.advertisements.len(), 1);
    let adv = &pb.advertisements[0];
    assert_eq!(adv.mac_address, "1C:9D:C2:69:14:36");
    assert_eq!(adv.timestamp.timestamp(), 1_740_000_984);
    assert_eq!(adv.latitude, Some(19.4346059));
    assert_eq!(adv.longitude, Some(-99.1802234));
    assert_eq!(adv.altitude, Some(2240.800048828125));
    assert_eq!(adv.model, "GENERIC");
    assert_eq!(adv.device_name, "Core200S");
    assert_eq!(adv.rssi, -60);
    assert_eq!(adv.tx_power, None);
    assert_eq!(adv.manufacturer_data.len(), 1);
    assert_eq!(adv.manufacturer_data[0].company_id, 0x06D0);
    assert_eq!(
        adv.manufacturer_data[0].data,
        [
            0x01, 0x36, 0x14, 0x69, 0xC2, 0x9D, 0x1C, 0xC6, 0x23, 0x02, 0x02, 0x02
        ]
    );
    assert!(adv.service_data.is_empty());
}

#[test]
fn test_pd_capture_canonicalizes_io_keys() {
    let Packet::Pd(pd) = Packet::decode(PD_CAPTURE).unwrap() else {
        panic!("expected Pd");
    };
    assert_eq!(pd.timestamp.timestamp(), 1_740_081_532);
    assert_eq!(pd.position.latitude, None);
    assert_eq!(pd.position.longitude, None);
    assert_eq!(pd.position.hdop, None);

    assert_eq!(
        pd.extra_data.get("report.code"),
        Some(&ArgValue::Text("LKSEN".into()))
    );
    assert_eq!(pd.extra_data.get("fw.build"), Some(&ArgValue::Int(49)));
    assert_eq!(pd.extra_data.get("wifi.rssi"), Some(&ArgValue::Int(-61)));
    assert_eq!(
        pd.extra_data.get("gpio.1.digital.input"),
        Some(&ArgValue::Int(0))
    );
    assert_eq!(
        pd.extra_data.get("gpio.47.digital.input"),
        Some(&ArgValue::Int(0))
    );
    // The legacy spelling is gone after canonicalization.
    assert_eq!(pd.extra_data.get("io1.di"), None);

    // Canonical keys survive a second pass unchanged.
    let rewire = Packet::Pd(pd.clone()).encode().unwrap();
    let again = Packet::decode(&rewire).unwrap();
    assert_eq!(again, Packet::Pd(pd));
}

#[test]
fn test_tampered_checksum_rejected() {
    for capture in [
        TS_CAPTURE, PA_CAPTURE, PR_CAPTURE, AB_CAPTURE, AC_CAPTURE, PC_CAPTURE, PI_CAPTURE,
        PS_CAPTURE, PB_CAPTURE, PD_CAPTURE,
    ] {
        let close = capture.rfind("</").unwrap();
        let mut tampered = capture.to_string();
        tampered.replace_range(close - 4..close, "0000");
        assert!(
            matches!(
                Packet::decode(&tampered).unwrap_err(),
                ProtocolError::Checksum { .. }
            ),
            "{capture}"
        );
    }
}

#[test]
fn test_lowercase_checksum_rejected() {
    // Same digits, wrong case: the comparison is case-sensitive.
    let tampered = TS_CAPTURE.replace("696E", "696e");
    assert!(matches!(
        Packet::decode(&tampered).unwrap_err(),
        ProtocolError::Checksum { .. }
    ));
}

#[test]
fn test_unknown_tag_rejected_after_checksum() {
    // Valid frame and checksum, unregistered tag.
    assert!(matches!(
        Packet::decode("<Zz>;7F28</Zz>").unwrap_err(),
        ProtocolError::UnknownPacket(tag) if tag == "Zz"
    ));
    // A stale checksum wins over the unknown tag.
    assert!(matches!(
        Packet::decode("<Zz>;0000</Zz>").unwrap_err(),
        ProtocolError::Checksum { .. }
    ));
}

#[test]
fn test_mismatched_close_tag_rejected() {
    assert!(matches!(
        Packet::decode("<Ts>1735689600;123e4567-e89b-12d3-a456-426614174000;696E</Te>")
            .unwrap_err(),
        ProtocolError::Frame(_)
    ));
}

#[test]
fn test_wrong_field_count_rejected() {
    // Well-formed frame with a fresh checksum but one field too many.
    let wire = frame::build("Ao", &["1735689600".to_string(), "extra".to_string()]);
    assert!(matches!(
        Packet::decode(&wire).unwrap_err(),
        ProtocolError::Frame(_)
    ));
}

#[test]
fn test_partial_command_group_rejected() {
    // Ac fields must come in groups of four.
    let wire = frame::build(
        "Ac",
        &["1".to_string(), "set_config".to_string(), "".to_string()],
    );
    assert!(matches!(
        Packet::decode(&wire).unwrap_err(),
        ProtocolError::Frame(_)
    ));
}

#[test]
fn test_zero_field_variants_roundtrip() {
    for (wire, tag) in [
        ("<Pr>;7F28</Pr>", "Pr"),
        ("<As>;7F28</As>", "As"),
        ("<Au>;7F28</Au>", "Au"),
    ] {
        let packet = Packet::decode(wire).unwrap();
        assert_eq!(packet.tag(), tag);
        assert_eq!(packet.encode().unwrap(), wire);
    }
}
