use crate::base;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("extraction failed")]
    Extraction(#[from] base::ExtractionError),
    #[error("failed to save receipt")]
    Store(#[from] base::StoreError),
    #[error("an upload is already being analyzed")]
    Busy,
    #[error("dismiss the failed upload before continuing")]
    NotDismissed,
}

/// Where an upload slot is in its lifecycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Analyzing,
    Success(base::ReceiptRecord),
    /// Failure message, kept until dismissed.
    Error(String),
}

/// A stored receipt fresh out of the pipeline.
#[derive(Debug)]
pub struct Ingested {
    pub record: base::ReceiptRecord,
    pub refresh: base::Refresh,
}

/// A single upload slot. At most one extraction is in flight per slot.
#[derive(Debug, Default)]
pub struct Upload {
    image: Option<base::Image>,
    phase: Phase,
}

impl Upload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn image(&self) -> Option<&base::Image> {
        self.image.as_ref()
    }

    /// Replaces the selected image. A previous success is cleared.
    pub fn select(&mut self, image: base::Image) -> Result<(), IngestError> {
        match self.phase {
            Phase::Analyzing => return Err(IngestError::Busy),
            Phase::Error(_) => return Err(IngestError::NotDismissed),
            Phase::Idle | Phase::Success(_) => {}
        }
        self.image = Some(image);
        self.phase = Phase::Idle;
        Ok(())
    }

    /// Returns to idle. After a failure the selected image is kept so the
    /// same upload can be retried.
    pub fn dismiss(&mut self) {
        if self.phase != Phase::Analyzing {
            self.phase = Phase::Idle;
        }
    }

    /// Runs the selected image through extraction and into the store.
    ///
    /// Returns `Ok(None)` when no image is selected. On failure the slot moves
    /// to [`Phase::Error`] with the failure message and the error is also
    /// returned.
    pub async fn submit<E, G>(
        &mut self,
        extractor: &E,
        gateway: &G,
    ) -> Result<Option<Ingested>, IngestError>
    where
        E: base::Extractor + ?Sized,
        G: base::Gateway + ?Sized,
    {
        match self.phase {
            Phase::Analyzing => return Err(IngestError::Busy),
            Phase::Error(_) => return Err(IngestError::NotDismissed),
            Phase::Idle | Phase::Success(_) => {}
        }
        let Some(image) = &self.image else {
            return Ok(None);
        };

        self.phase = Phase::Analyzing;
        tracing::info!(phase = "analyzing", "upload submitted");
        match ingest(extractor, gateway, image).await {
            Ok(ingested) => {
                tracing::info!(phase = "success", id = %ingested.record.id(), "upload stored");
                self.image = None;
                self.phase = Phase::Success(ingested.record.clone());
                Ok(Some(ingested))
            }
            Err(e) => {
                let message = error_chain(&e);
                tracing::warn!(phase = "error", %message, "upload failed");
                self.phase = Phase::Error(message);
                Err(e)
            }
        }
    }
}

fn error_chain(e: &dyn std::error::Error) -> String {
    let mut s = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        s.push_str(": ");
        s.push_str(&cause.to_string());
        source = cause.source();
    }
    s
}

/// Extracts `image`, builds a pending receipt from the result and inserts it.
/// Extraction strictly precedes the insert, and nothing is written when
/// extraction fails.
#[tracing::instrument(name = "ingest", skip_all, fields(store = gateway.backend_tag()))]
pub async fn ingest<E, G>(
    extractor: &E,
    gateway: &G,
    image: &base::Image,
) -> Result<Ingested, IngestError>
where
    E: base::Extractor + ?Sized,
    G: base::Gateway + ?Sized,
{
    let fields = extractor.extract(image).await?;
    let receipt = build_receipt(fields, image.reference());
    let record = gateway.insert(receipt).await?;
    Ok(Ingested {
        record,
        refresh: base::Refresh::new(),
    })
}

fn non_negative(field: &'static str, x: base::Cents) -> base::Cents {
    if x.is_negative() {
        tracing::warn!(field, amount = %x, "clamped negative amount to zero");
        base::Cents::ZERO
    } else {
        x
    }
}

fn receipt_time(s: &str) -> base::Timestamp {
    if s.is_empty() {
        tracing::debug!("no receipt time extracted, using now");
        return base::Timestamp::now();
    }
    match s.parse::<base::Timestamp>() {
        Ok(ts) => ts,
        Err(e) => {
            tracing::warn!(error = %e, "using now as receipt time");
            base::Timestamp::now()
        }
    }
}

/// Turns extracted fields into a pending receipt whose tax and total agree
/// with their components.
pub fn build_receipt(fields: base::ExtractedFields, reference: Option<&str>) -> base::Receipt {
    let mut amounts = base::Amounts {
        subtotal: non_negative("subtotal", fields.subtotal),
        gst_hst: non_negative("gst_hst", fields.gst_hst),
        pst_qst: non_negative("pst_qst", fields.pst_qst),
    };
    let tax = non_negative("tax", fields.tax);
    let total = non_negative("total", fields.total);

    if amounts.tax() == base::Cents::ZERO && tax > base::Cents::ZERO {
        tracing::info!(%tax, "attributed unsplit tax to gst/hst");
        amounts.gst_hst = tax;
    }
    if amounts.subtotal == base::Cents::ZERO && total > base::Cents::ZERO && total >= amounts.tax()
    {
        amounts.subtotal = total - amounts.tax();
        tracing::info!(subtotal = %amounts.subtotal, "backfilled subtotal from total");
    }

    base::Receipt::new(receipt_time(&fields.receipt_time), amounts)
        .with_vendor_name(fields.vendor_name)
        .with_receipt_number(fields.receipt_number)
        .with_payment(fields.payment)
        .with_chart_of_account(fields.chart_of_account)
        .with_image_reference(reference.map(str::to_string))
}

#[cfg(test)]
mod tests {
    use base::Gateway;
    use rstest::rstest;

    use super::*;

    /// Answers every extraction with a canned model response.
    struct Canned(&'static str);

    #[async_trait::async_trait]
    impl base::Extractor for Canned {
        async fn extract(
            &self,
            _image: &base::Image,
        ) -> Result<base::ExtractedFields, base::ExtractionError> {
            base::extract::parse_response(self.0)
        }
    }

    /// A store that is always down.
    struct Down;

    #[async_trait::async_trait]
    impl base::Gateway for Down {
        fn backend_tag(&self) -> &'static str {
            "down"
        }

        async fn fetch_all(&self) -> Result<base::Recordlist, base::StoreError> {
            Err(Self::error())
        }

        async fn insert(
            &self,
            _receipt: base::Receipt,
        ) -> Result<base::ReceiptRecord, base::StoreError> {
            Err(Self::error())
        }

        async fn update_fields(
            &self,
            _ids: &[base::RecordId],
            _update: &base::FieldUpdate,
        ) -> Result<(), base::StoreError> {
            Err(Self::error())
        }
    }

    impl Down {
        fn error() -> base::StoreError {
            base::StoreError::Status {
                status: 503,
                body: "unavailable".to_string(),
            }
        }
    }

    const CAFE: &str = r#"{"vendor_name":"Corner Cafe","receipt_no":"A-17","receipt_time":"2026-02-15T14:30:00Z","subtotal":18.50,"gst_hst":0.93,"pst_qst":0,"tax":0.93,"total":19.43,"payment":"Visa","chart_of_acct":"Meals & Entertainment"}"#;

    fn tempstore() -> (base::FileStore, tempfile::TempDir) {
        let td = tempfile::TempDir::new().unwrap();
        let store = base::FileStore::new(td.path().join("receipts.jsonl"));
        (store, td)
    }

    fn image() -> base::Image {
        base::Image::new(vec![0xff, 0xd8]).with_reference("scans/cafe.jpg")
    }

    fn fields(s: &str) -> base::ExtractedFields {
        base::extract::parse_response(s).unwrap()
    }

    #[test]
    fn test_build_receipt_defaults() {
        let r = build_receipt(base::ExtractedFields::default(), None);
        assert_eq!(r.vendor_name(), "");
        assert_eq!(r.receipt_number(), "");
        assert_eq!(r.payment(), "");
        assert_eq!(r.chart_of_account(), "");
        assert_eq!(r.amounts(), base::Amounts::default());
        assert_eq!((r.tax(), r.total()), (base::Cents::ZERO, base::Cents::ZERO));
        assert_eq!(r.status(), base::Status::Pending);
        assert_eq!(r.receipt_time(), base::Timestamp::now());
        assert_eq!(r.image_reference(), None);
    }

    #[test]
    fn test_build_receipt() {
        let r = build_receipt(fields(CAFE), Some("scans/cafe.jpg"));
        assert_eq!(r.vendor_name(), "Corner Cafe");
        assert_eq!(r.receipt_number(), "A-17");
        assert_eq!(r.receipt_time().to_string(), "2026-02-15T14:30:00Z");
        assert_eq!(r.tax(), base::Cents(93));
        assert_eq!(r.total(), base::Cents(1943));
        assert_eq!(r.chart_of_account(), "Meals & Entertainment");
        assert_eq!(r.image_reference(), Some("scans/cafe.jpg"));
    }

    #[test]
    fn test_build_receipt_ignores_extracted_status() {
        let r = build_receipt(fields(r#"{"status":"exported"}"#), None);
        assert_eq!(r.status(), base::Status::Pending);
    }

    #[rstest]
    #[case("2026-02-15", "2026-02-15T00:00:00Z")]
    #[case("2026-02-15 09:05:00", "2026-02-15T09:05:00Z")]
    #[case("2026-02-15T09:05:00-05:00", "2026-02-15T14:05:00Z")]
    #[case("Feb 15", "2026-03-30T12:00:00Z")]
    // Out of range once shifted to UTC.
    #[case("0000-01-01T00:30:00+01:00", "2026-03-30T12:00:00Z")]
    fn test_build_receipt_time(#[case] s: &str, #[case] want: &str) {
        let f = base::ExtractedFields {
            receipt_time: s.to_string(),
            ..Default::default()
        };
        assert_eq!(build_receipt(f, None).receipt_time().to_string(), want)
    }

    #[rstest]
    // Inconsistent tax and total from the model are recomputed.
    #[case(r#"{"subtotal":10,"gst_hst":0.5,"pst_qst":0.7,"tax":9,"total":99}"#, (1000, 50, 70, 120, 1120))]
    // Unsplit tax is attributed to gst/hst.
    #[case(r#"{"subtotal":10,"tax":1.3,"total":11.3}"#, (1000, 130, 0, 130, 1130))]
    // Missing subtotal is backfilled from the total.
    #[case(r#"{"gst_hst":0.5,"total":10.5}"#, (1000, 50, 0, 50, 1050))]
    #[case(r#"{"total":"$1,200.00"}"#, (120000, 0, 0, 0, 120000))]
    // Total below tax leaves the subtotal alone.
    #[case(r#"{"gst_hst":5,"total":2}"#, (0, 500, 0, 500, 500))]
    // Negatives are clamped.
    #[case(r#"{"subtotal":-4,"gst_hst":-1,"pst_qst":0.4,"total":-5}"#, (0, 0, 40, 40, 40))]
    // Implausibly large amounts are dropped.
    #[case(r#"{"subtotal":90000000000000000,"gst_hst":90000000000000000}"#, (0, 0, 0, 0, 0))]
    #[case(r#"{"subtotal":12.5,"total":"5000000000000"}"#, (1250, 0, 0, 0, 1250))]
    fn test_build_receipt_amounts(#[case] s: &str, #[case] want: (i64, i64, i64, i64, i64)) {
        let r = build_receipt(fields(s), None);
        let got = (
            r.subtotal().0,
            r.gst_hst().0,
            r.pst_qst().0,
            r.tax().0,
            r.total().0,
        );
        assert_eq!(got, want);
    }

    #[tokio::test]
    async fn test_submit_success() {
        let (store, _td) = tempstore();
        let mut upload = Upload::new();
        upload.select(image()).unwrap();

        let ingested = upload.submit(&Canned(CAFE), &store).await.unwrap().unwrap();
        assert_eq!(ingested.record.id(), base::RecordId(1));
        assert_eq!(ingested.record.status(), base::Status::Pending);
        assert_eq!(upload.phase(), &Phase::Success(ingested.record.clone()));
        assert_eq!(upload.image(), None);

        let rl = ingested.refresh.refetch(&store).await.unwrap();
        assert_eq!(rl.iter().collect::<Vec<_>>(), vec![&ingested.record]);
    }

    #[tokio::test]
    async fn test_submit_without_image_is_noop() {
        let (store, _td) = tempstore();
        let mut upload = Upload::new();
        assert!(upload.submit(&Canned(CAFE), &store).await.unwrap().is_none());
        assert_eq!(upload.phase(), &Phase::Idle);
        assert!(store.fetch_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_extraction_failure_inserts_nothing() {
        let (store, _td) = tempstore();
        let mut upload = Upload::new();
        upload.select(image()).unwrap();

        let err = upload
            .submit(&Canned("Sorry, I can't read that."), &store)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            IngestError::Extraction(base::ExtractionError::NoJsonObject)
        ));
        assert_eq!(
            upload.phase(),
            &Phase::Error("extraction failed: model response contains no JSON object".to_string())
        );
        assert!(store.fetch_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_error_must_be_dismissed_and_keeps_image() {
        let mut upload = Upload::new();
        upload.select(image()).unwrap();

        let err = upload.submit(&Canned(CAFE), &Down).await.unwrap_err();
        assert!(matches!(err, IngestError::Store(_)));
        assert_eq!(
            upload.phase(),
            &Phase::Error(
                "failed to save receipt: record store responded with status 503: unavailable"
                    .to_string()
            )
        );

        let err = upload.submit(&Canned(CAFE), &Down).await.unwrap_err();
        assert!(matches!(err, IngestError::NotDismissed));
        assert!(matches!(
            upload.select(image()),
            Err(IngestError::NotDismissed)
        ));

        upload.dismiss();
        assert_eq!(upload.phase(), &Phase::Idle);
        assert_eq!(upload.image(), Some(&image()));

        let (store, _td) = tempstore();
        let ingested = upload.submit(&Canned(CAFE), &store).await.unwrap();
        assert!(ingested.is_some());
    }

    #[tokio::test]
    async fn test_submit_while_analyzing_is_rejected() {
        let mut upload = Upload {
            image: Some(image()),
            phase: Phase::Analyzing,
        };
        let err = upload.submit(&Canned(CAFE), &Down).await.unwrap_err();
        assert!(matches!(err, IngestError::Busy));
        assert!(matches!(upload.select(image()), Err(IngestError::Busy)));
        upload.dismiss();
        assert_eq!(upload.phase(), &Phase::Analyzing);
    }
}
