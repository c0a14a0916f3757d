#[path = "../common/mod.rs"]
mod common;

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;
    use netprofiler::model::{LegacyFilter, TimeFilter, TrafficFilter, Value};
    use netprofiler::report::{ProfiledReport, ReportParams, ReportState, RunOutcome};

    use super::common::{appliance, FakeApi};

    fn window() -> TimeFilter {
        TimeFilter::new(1_000, 1_300).unwrap()
    }

    #[test]
    fn test_summary_criteria() {
        let api = FakeApi::new();
        let mut report = ProfiledReport::traffic_summary(&appliance(&api));
        report
            .run(
                ReportParams::new()
                    .groupby("hos")
                    .columns(["host", "avg_util"])
                    .sort_col("avg_util")
                    .timefilter(window())
                    .resolution("15min")
                    .traffic_filter(TrafficFilter::new("host 10.0.0.0/8")),
            )
            .unwrap();

        let json = serde_json::to_string(&api.created()[0]).unwrap();
        assert_snapshot!(json, @r#"{"template_id":184,"criteria":{"time_frame":{"start":1000,"end":1300,"resolution":"15min"},"query":{"realm":"traffic_summary","centricity":"hos","group_by":"hos","columns":[6,40],"sort_column":40},"traffic_expression":"host 10.0.0.0/8"}}"#);
    }

    #[test]
    fn test_host_group_type_only_for_group_groupbys() {
        let api = FakeApi::new();
        let app = appliance(&api);

        let mut report = ProfiledReport::traffic_summary(&app);
        report
            .run(ReportParams::new().groupby("gro").columns(["avg_util"]))
            .unwrap();
        let mut report = ProfiledReport::traffic_summary(&app);
        report
            .run(
                ReportParams::new()
                    .groupby("gpp")
                    .columns(["avg_util"])
                    .host_group_type("ByRegion")
                    .area("wan"),
            )
            .unwrap();
        let mut report = ProfiledReport::traffic_summary(&app);
        report
            .run(
                ReportParams::new()
                    .groupby("hos")
                    .columns(["avg_util"])
                    .host_group_type("ByRegion"),
            )
            .unwrap();

        let created = api.created();
        let query = |i: usize| created[i].criteria.query.clone().unwrap();
        assert_eq!(query(0).host_group_type.as_deref(), Some("ByLocation"));
        assert_eq!(query(1).host_group_type.as_deref(), Some("ByRegion"));
        assert_eq!(query(1).area.as_deref(), Some("wan"));
        assert_eq!(query(2).host_group_type, None);
    }

    #[test]
    fn test_time_series_fixes_groupby() {
        let api = FakeApi::new();
        let mut report = ProfiledReport::traffic_overall_time_series(&appliance(&api));
        report
            .run(ReportParams::new().columns(["time", "avg_util"]))
            .unwrap();

        let query = api.created()[0].criteria.query.clone().unwrap();
        assert_eq!(query.realm, "traffic_overall_time_series");
        assert_eq!(query.group_by, "tim");
        assert_eq!(query.columns, vec![41, 40]);
    }

    #[test]
    fn test_disallowed_parameters_rejected_before_submission() {
        let api = FakeApi::new();
        let app = appliance(&api);

        let err = ProfiledReport::traffic_overall_time_series(&app)
            .run(ReportParams::new().columns(["avg_util"]).sort_col("avg_util"))
            .unwrap_err();
        assert!(err.is_invalid_argument());

        let err = ProfiledReport::traffic_flow_list(&app)
            .run(ReportParams::new().columns(["host"]).groupby("ifc"))
            .unwrap_err();
        assert!(err.is_invalid_argument());

        let err = ProfiledReport::traffic_flow_list(&app)
            .run(ReportParams::new().columns(["host"]).host_group_type("ByLocation"))
            .unwrap_err();
        assert!(err.is_invalid_argument());

        let err = ProfiledReport::traffic_summary(&app)
            .run(ReportParams::new().columns(["host"]).resolution("900"))
            .unwrap_err();
        assert!(err.is_invalid_argument());

        assert!(api.created().is_empty());
    }

    #[test]
    fn test_unknown_column_fails() {
        let api = FakeApi::new();
        let err = ProfiledReport::traffic_summary(&appliance(&api))
            .run(ReportParams::new().columns(["no_such_column"]))
            .unwrap_err();
        assert_eq!(err.to_string(), "unknown column: no_such_column");
    }

    #[test]
    fn test_flow_list_runs_at_one_minute() {
        let api = FakeApi::new();
        let mut report = ProfiledReport::traffic_flow_list(&appliance(&api));
        report
            .run(ReportParams::new().columns(["host", "avg_util"]).sort_col("avg_util"))
            .unwrap();

        let request = &api.created()[0];
        assert_eq!(
            request.criteria.time_frame.resolution.map(|r| r.as_str()),
            Some("1min")
        );
        let query = request.criteria.query.clone().unwrap();
        assert_eq!((query.group_by.as_str(), query.centricity.as_str()), ("hos", "hos"));
        assert_eq!(query.sort_column, Some(40));
    }

    #[test]
    fn test_identity_report() {
        let api = FakeApi::new();
        api.add_rows(
            "alice",
            vec![vec![
                (42, Value::from("1700000000")),
                (201, Value::from("alice")),
                (204, Value::from("10.0.0.5")),
            ]],
        );
        let mut report = ProfiledReport::identity(&appliance(&api));
        let outcome = report
            .run(ReportParams::new().subject("alice").timefilter(window()))
            .unwrap();
        assert_eq!(outcome, RunOutcome::Completed);

        let request = &api.created()[0];
        let query = request.criteria.query.clone().unwrap();
        assert_eq!(query.realm, "identity_list");
        assert_eq!(query.group_by, "thu");
        assert_eq!(query.columns, vec![42, 201, 202, 203, 204, 205, 206, 207, 208]);
        assert_eq!(
            request.criteria.deprecated.as_ref().unwrap().get("user").map(String::as_str),
            Some("alice")
        );

        let legend: Vec<String> = report.legend(None).unwrap().into_iter().map(|c| c.key).collect();
        assert_eq!(legend[0], "time");
        assert_eq!(legend.len(), 9);

        let rows = report.data(None).unwrap();
        assert_eq!(rows[0][0], Value::Int(1_700_000_000));
        assert_eq!(rows[0][1], Value::from("alice"));
        assert_eq!(rows[0][2], Value::Null);
    }

    #[test]
    fn test_data_uses_requested_column_order() {
        let api = FakeApi::new();
        api.add_rows(
            "",
            vec![vec![(6, Value::from("10.0.0.1")), (40, Value::from("0.25"))]],
        );
        api.set_totals("", vec![(40, Value::from("0.25"))]);
        let mut report = ProfiledReport::traffic_summary(&appliance(&api));
        report
            .run(ReportParams::new().columns(["avg_util", "host"]))
            .unwrap();

        assert_eq!(report.columns()[0].key, "avg_util");
        assert_eq!(
            report.data(None).unwrap(),
            vec![vec![Value::Float(0.25), Value::from("10.0.0.1")]]
        );
        assert_eq!(report.totals(None).unwrap(), vec![Value::Float(0.25), Value::Null]);
        assert_eq!(report.iter_data(None).unwrap().len(), 1);
        assert_eq!(api.fetches().len(), 1);

        report.delete().unwrap();
        assert_eq!(report.report().state(), ReportState::Deleted);
    }

    #[test]
    fn test_legacy_filter_is_optional() {
        let api = FakeApi::new();
        let app = appliance(&api);

        ProfiledReport::traffic_summary(&app)
            .run(ReportParams::new().columns(["avg_util"]))
            .unwrap();
        ProfiledReport::traffic_summary(&app)
            .run(
                ReportParams::new()
                    .columns(["avg_util"])
                    .legacy_filter(LegacyFilter::new("interfaces_a", "10.0.0.1:1")),
            )
            .unwrap();

        let created = api.created();
        assert_eq!(created[0].criteria.deprecated, None);
        assert!(created[1].criteria.deprecated.is_some());
    }
}
