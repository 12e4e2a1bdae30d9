    use super::*;

    fn client(via_proxy: bool) -> CatalogClient {
        let cfg = FitmentConfig {
            base_url: Some("http://backend.test".to_string()),
            via_proxy,
            ..FitmentConfig::default()
        };
        CatalogClient::new(&cfg).expect("build client")
    }

    #[test]
    fn direct_endpoint_carries_selected_pairs_query() {
        let url = client(false)
            .endpoint(
                "/api/fitment-search/values/3",
                &[SelectionPair::new(1, 10), SelectionPair::new(2, 55)],
            )
            .expect("endpoint");
        assert_eq!(url.path(), "/api/fitment-search/values/3");
        let pairs = url.query_pairs().collect::<Vec<_>>();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].0, "selected_pairs");
        assert_eq!(pairs[0].1, "1:10,2:55");
    }

    #[test]
    fn unconstrained_endpoint_has_no_query() {
        let url = client(false)
            .endpoint("/api/fitment-search/values/1", &[])
            .expect("endpoint");
        assert_eq!(url.as_str(), "http://backend.test/api/fitment-search/values/1");
    }

    #[test]
    fn proxied_endpoint_wraps_the_whole_target_in_path_param() {
        let url = client(true)
            .endpoint("/api/fitment-search/values/3", &[SelectionPair::new(1, 10)])
            .expect("endpoint");
        assert_eq!(url.path(), PROXY_ROUTE);
        let path = url
            .query_pairs()
            .find(|(k, _)| k == "path")
            .map(|(_, v)| v.into_owned())
            .expect("path param");
        assert_eq!(path, "/api/fitment-search/values/3?selected_pairs=1%3A10");
    }

    #[test]
    fn missing_base_url_is_rejected() {
        let err = CatalogClient::new(&FitmentConfig::default())
            .err()
            .expect("client without url");
        assert!(err.to_string().contains("PARTSLOGIC_URL"));
    }

    #[test]
    fn envelope_without_data_reports_missing_data() {
        let env: Envelope<OneOrMany<FitmentValue>> =
            serde_json::from_str(r#"{"success": true}"#).expect("parse envelope");
        assert!(env.data.is_none());
        let err = env.into_data("values").err().expect("missing data");
        assert!(err.to_string().contains("missing data"));
    }

    #[test]
    fn envelope_accepts_a_single_value_object() {
        let env: Envelope<OneOrMany<FitmentValue>> =
            serde_json::from_str(r#"{"success": true, "data": {"id": 7, "value": "2020"}}"#)
                .expect("parse envelope");
        let values = env.into_data("values").expect("data").into_vec();
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].label(), "2020");
    }

    #[test]
    fn rejected_envelope_surfaces_backend_message() {
        let env: Envelope<Vec<RootType>> =
            serde_json::from_str(r#"{"success": false, "message": "down"}"#).expect("parse");
        let err = env.into_data("root types").err().expect("rejected");
        assert!(err.to_string().contains("down"));
    }
