//! Verify build methods against the JSON test vectors in `test-vectors/`.
//!
//! Each case names an operation, its inputs, and the exact request the
//! client must produce for it.

use datagen_client::{DataClient, HttpMethod, HttpRequest, MultipartForm, Params};
use serde_json::Value;

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        other => panic!("unknown method: {other}"),
    }
}

fn pairs(value: &Value) -> Vec<(String, String)> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|pair| {
            let arr = pair.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect()
}

fn build(client: &DataClient, case: &Value) -> HttpRequest {
    match case["operation"].as_str().unwrap() {
        "generate_data" => client.build_generate_data(&Params::from(pairs(&case["params"]))),
        "get_sample" => client.build_get_sample(
            case["sample_type"].as_str().unwrap(),
            &Params::from(pairs(&case["params"])),
        ),
        "upload_file" => {
            let mut form = MultipartForm::with_boundary(case["boundary"].as_str().unwrap());
            for file in case["files"].as_array().unwrap() {
                let f = file.as_array().unwrap();
                form = form.file(
                    f[0].as_str().unwrap(),
                    f[1].as_str().unwrap(),
                    f[2].as_str().unwrap(),
                    f[3].as_str().unwrap().as_bytes().to_vec(),
                );
            }
            client.build_upload_file(&form)
        }
        other => panic!("unknown operation: {other}"),
    }
}

#[test]
fn request_test_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();
    let base_url = vectors["base_url"].as_str().unwrap();
    let client = DataClient::with_base_url(base_url).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let expected = &case["expected_request"];
        let req = build(&client, case);

        assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(
            req.url,
            format!("{base_url}{}", expected["url"].as_str().unwrap()),
            "{name}: url"
        );

        let headers: Vec<(String, String)> = req.headers.clone().into_iter().collect();
        assert_eq!(headers, pairs(&expected["headers"]), "{name}: headers");

        match expected["body"].as_str() {
            Some(body) => assert_eq!(req.body.as_deref(), Some(body.as_bytes()), "{name}: body"),
            None => assert!(req.body.is_none(), "{name}: body should be None"),
        }
    }
}
