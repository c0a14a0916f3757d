#[path = "../common/mod.rs"]
mod common;

#[cfg(test)]
mod tests {
    use netprofiler::model::{TimeFilter, Value};
    use netprofiler::report::{WanRequest, WanSummaryReport};

    use super::common::{appliance, FakeApi, FakeRow};

    const LAN: &str = "10.99.16.252:1";
    const WAN: &str = "10.99.16.252:2";

    fn row(host: &str, in_bytes: &str, out_bytes: &str) -> FakeRow {
        vec![
            (6, Value::from(host)),
            (33, Value::from(in_bytes)),
            (34, Value::from(out_bytes)),
        ]
    }

    fn api() -> std::sync::Arc<FakeApi> {
        let api = FakeApi::new();
        api.add_rows(LAN, vec![row("a", "1", "10"), row("x", "2", "20")]);
        api.add_rows(WAN, vec![row("a", "100", "1000"), row("b", "300", "3000")]);
        api
    }

    fn request(direction: &str) -> WanRequest {
        WanRequest::new(LAN, WAN, direction)
            .groupby("hos")
            .columns(["host", "in_bytes"])
            .timefilter(TimeFilter::new(0, 3_600).unwrap())
    }

    #[test]
    fn test_inbound_merge() {
        let api = api();
        let mut wan = WanSummaryReport::new(&appliance(&api));

        let table = wan.run(request("inbound")).unwrap();
        assert_eq!(table.legend(), vec!["host", "LAN_bytes", "WAN_bytes"]);
        assert_eq!(table.string_rows(), vec![vec!["a", "10", "100"]]);
        assert_eq!(table.rows[0].values, vec![Value::Int(10), Value::Int(100)]);
    }

    #[test]
    fn test_outbound_merge() {
        let api = api();
        let mut wan = WanSummaryReport::new(&appliance(&api));

        wan.run(request("outbound")).unwrap();
        assert_eq!(wan.legend().unwrap(), vec!["host", "LAN_bytes", "WAN_bytes"]);
        assert_eq!(wan.rows().unwrap(), vec![vec!["a", "1", "1000"]]);
    }

    #[test]
    fn test_sub_reports_scoped_by_interface() {
        let api = api();
        let mut wan = WanSummaryReport::new(&appliance(&api));
        wan.run(request("inbound")).unwrap();

        let created = api.created();
        assert_eq!(created.len(), 2);
        let scope = |i: usize| created[i].criteria.deprecated.clone().unwrap()["interfaces_a"].clone();
        assert_eq!(scope(0), WAN);
        assert_eq!(scope(1), LAN);

        let query = created[0].criteria.query.clone().unwrap();
        assert_eq!(query.realm, "traffic_summary");
        assert_eq!(query.centricity, "int");
        assert_eq!(query.group_by, "hos");
        assert_eq!(query.columns, vec![6, 33, 34]);
        assert_eq!(
            created[0].criteria.time_frame.resolution.map(|r| r.as_str()),
            Some("15min")
        );

        assert_eq!(api.deleted(), vec![1000, 1001]);
        assert_eq!(api.live_reports(), 0);
    }

    #[test]
    fn test_repeat_reuses_interface_data() {
        let api = api();
        let mut wan = WanSummaryReport::new(&appliance(&api));

        wan.run(request("inbound")).unwrap();
        wan.run(request("inbound")).unwrap();
        wan.run(request("outbound")).unwrap();
        assert_eq!(wan.report_runs(), 2);
        assert_eq!(api.created().len(), 2);
        assert_eq!(wan.rows().unwrap(), vec![vec!["a", "1", "1000"]]);

        wan.run(request("inbound").timefilter(TimeFilter::new(0, 7_200).unwrap()))
            .unwrap();
        assert_eq!(wan.report_runs(), 4);

        wan.run(request("inbound").columns(["host", "out_bytes", "avg_util"]))
            .unwrap();
        assert_eq!(wan.report_runs(), 6);
    }

    #[test]
    fn test_repeat_with_default_window_reuses_interface_data() {
        let api = api();
        let mut wan = WanSummaryReport::new(&appliance(&api));
        let default_window = || {
            WanRequest::new(LAN, WAN, "inbound")
                .groupby("hos")
                .columns(["host", "in_bytes"])
        };

        wan.run(default_window()).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(1_100));
        wan.run(default_window()).unwrap();
        assert_eq!(wan.report_runs(), 2);
        assert_eq!(api.created().len(), 2);
        assert_eq!(wan.rows().unwrap(), vec![vec!["a", "10", "100"]]);

        let frame = &api.created()[0].criteria.time_frame;
        assert_eq!(frame.end - frame.start, 3_600);

        wan.run(default_window().timefilter(TimeFilter::new(0, 3_600).unwrap()))
            .unwrap();
        assert_eq!(wan.report_runs(), 4);
    }

    #[test]
    fn test_directional_names_collapse_to_one_pair() {
        let api = api();
        let mut wan = WanSummaryReport::new(&appliance(&api));

        wan.run(request("inbound").columns(["host", "in_bytes", "out_bytes"]))
            .unwrap();
        assert_eq!(
            api.created()[0].criteria.query.clone().unwrap().columns,
            vec![6, 33, 34]
        );
    }

    #[test]
    fn test_invalid_direction_is_domain_error() {
        let api = api();
        let mut wan = WanSummaryReport::new(&appliance(&api));

        let err = wan.run(request("sideways")).unwrap_err();
        assert!(err.is_domain());
        assert!(err.to_string().contains("sideways"));
        assert!(api.created().is_empty());
    }

    #[test]
    fn test_output_before_run() {
        let api = api();
        let wan = WanSummaryReport::new(&appliance(&api));
        assert!(wan.table().unwrap_err().is_invalid_argument());
        assert!(wan.rows().unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_sub_report_timeout_fails_merge() {
        let api = api();
        api.stay_at("running", 30.0);
        let app = appliance(&api).with_poll_policy(netprofiler::config::PollPolicy {
            interval: std::time::Duration::from_millis(1),
            timeout: std::time::Duration::from_millis(10),
        });
        let mut wan = WanSummaryReport::new(&app);

        let err = wan.run(request("inbound")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "timed out waiting for report 1000 to complete, last 30% complete"
        );
        assert_eq!(api.deleted(), vec![1000]);
        assert!(wan.table().is_err());
    }
}
