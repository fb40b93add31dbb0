use super::*;

const MB: u64 = 1024 * 1024;

fn config(mode: UploadMode) -> UploadConfig {
    UploadConfig {
        upload_type: "profile-document".to_owned(),
        mode,
        max_files: 3,
        max_file_size: 5 * MB,
        accepted_types: vec!["application/pdf".to_owned(), "image/*".to_owned()],
    }
}

fn pdf(name: &str, size: u64) -> FileMeta {
    FileMeta::new(name, "application/pdf", size)
}

fn preview(n: u32) -> Option<PreviewUrl> {
    Some(PreviewUrl::new(format!("blob:preview-{n}")))
}

// =============================================================
// Config
// =============================================================

#[test]
fn default_config_allows_five_files_of_ten_megabytes() {
    let cfg = UploadConfig::new("homework");
    assert_eq!(cfg.mode, UploadMode::Multiple);
    assert_eq!(cfg.max_files, 5);
    assert_eq!(cfg.max_file_size, 10 * MB);
    assert!(cfg.accepts_mime("anything/at-all"));
}

#[test]
fn mime_whitelist_supports_families_and_exact_types() {
    let cfg = config(UploadMode::Multiple);
    assert!(cfg.accepts_mime("image/png"));
    assert!(cfg.accepts_mime("IMAGE/JPEG"));
    assert!(cfg.accepts_mime("application/pdf"));
    assert!(!cfg.accepts_mime("application/zip"));
    assert!(!cfg.accepts_mime("imagery/png"));
    assert_eq!(cfg.accept_attr(), "application/pdf,image/*");
}

#[test]
fn file_limit_is_one_in_single_mode() {
    assert_eq!(config(UploadMode::Single).file_limit(), 1);
    assert_eq!(config(UploadMode::Multiple).file_limit(), 3);
}

#[test]
fn parse_tags_trims_and_drops_blanks() {
    assert_eq!(parse_tags(" cv, ,letter ,"), vec!["cv".to_owned(), "letter".to_owned()]);
    assert!(parse_tags("  ").is_empty());
}

// =============================================================
// Validation
// =============================================================

#[test]
fn file_of_exactly_max_size_is_accepted() {
    let verdict = validate_batch(&config(UploadMode::Multiple), 0, &[pdf("a.pdf", 5 * MB)]).expect("batch");
    assert_eq!(verdict.accepted, vec![0]);
    assert!(verdict.message().is_none());
}

#[test]
fn one_byte_over_max_is_rejected_with_size_message() {
    let verdict = validate_batch(&config(UploadMode::Multiple), 0, &[pdf("big.pdf", 5 * MB + 1)]).expect("batch");
    assert!(verdict.accepted.is_empty());
    assert!(matches!(verdict.rejected[0], FileRejection::TooLarge { .. }));
    let message = verdict.message().expect("message");
    assert!(message.contains("big.pdf is too large"), "{message}");
    assert!(message.contains("5.0 MB"), "{message}");
}

#[test]
fn disallowed_type_is_rejected_with_type_message() {
    let verdict = validate_batch(
        &config(UploadMode::Multiple),
        0,
        &[FileMeta::new("notes.zip", "application/zip", 10)],
    )
    .expect("batch");
    assert_eq!(
        verdict.rejected,
        vec![FileRejection::TypeNotAllowed { name: "notes.zip".to_owned(), mime: "application/zip".to_owned() }]
    );
    assert!(verdict.message().expect("message").contains("not allowed"));
}

#[test]
fn mixed_batch_reports_all_problems_and_keeps_valid_files() {
    let candidates = [
        pdf("ok.pdf", MB),
        pdf("huge.pdf", 6 * MB),
        FileMeta::new("song.mp3", "audio/mpeg", MB),
    ];
    let verdict = validate_batch(&config(UploadMode::Multiple), 0, &candidates).expect("batch");
    assert_eq!(verdict.accepted, vec![0]);
    assert_eq!(verdict.rejected.len(), 2);
    let message = verdict.message().expect("message");
    assert!(message.contains("huge.pdf"), "{message}");
    assert!(message.contains("song.mp3"), "{message}");
}

#[test]
fn oversized_file_with_bad_type_reports_size_first() {
    let verdict = validate_batch(
        &config(UploadMode::Multiple),
        0,
        &[FileMeta::new("movie.mov", "video/quicktime", 50 * MB)],
    )
    .expect("batch");
    assert!(matches!(verdict.rejected.as_slice(), [FileRejection::TooLarge { .. }]));
}

#[test]
fn single_mode_rejects_multi_file_selection() {
    let result = validate_batch(&config(UploadMode::Single), 0, &[pdf("a.pdf", 1), pdf("b.pdf", 1)]);
    assert_eq!(result, Err(BatchRejection::SingleOnly));
}

#[test]
fn single_mode_allows_replacing_staged_file() {
    let verdict = validate_batch(&config(UploadMode::Single), 1, &[pdf("b.pdf", 1)]).expect("batch");
    assert_eq!(verdict.accepted, vec![0]);
}

#[test]
fn count_limit_includes_already_staged_files() {
    let cfg = config(UploadMode::Multiple);
    assert!(validate_batch(&cfg, 1, &[pdf("a.pdf", 1), pdf("b.pdf", 1)]).is_ok());
    assert_eq!(
        validate_batch(&cfg, 2, &[pdf("a.pdf", 1), pdf("b.pdf", 1)]),
        Err(BatchRejection::TooMany { max: 3 })
    );
}

#[test]
fn count_limit_aborts_before_per_file_checks() {
    let cfg = config(UploadMode::Multiple);
    let candidates = vec![pdf("x.pdf", 100 * MB); 4];
    assert_eq!(validate_batch(&cfg, 0, &candidates), Err(BatchRejection::TooMany { max: 3 }));
}

// =============================================================
// Staging and preview release
// =============================================================

#[test]
fn removing_staged_file_releases_preview_exactly_once() {
    let mut state = UploadState::default();
    let (id, released) = state.stage(UploadMode::Multiple, FileMeta::new("a.png", "image/png", 1), preview(1));
    assert!(released.is_empty());

    let first = state.remove(&id).expect("staged");
    assert_eq!(first.map(PreviewUrl::into_inner).as_deref(), Some("blob:preview-1"));
    assert!(state.remove(&id).is_none());
    assert!(state.clear().is_empty());
}

#[test]
fn single_mode_replacement_releases_previous_preview() {
    let mut state = UploadState::default();
    let (first, _) = state.stage(UploadMode::Single, FileMeta::new("a.png", "image/png", 1), preview(1));
    let (second, released) = state.stage(UploadMode::Single, FileMeta::new("b.png", "image/png", 1), preview(2));

    assert_ne!(first, second);
    assert_eq!(released, vec![PreviewUrl::new("blob:preview-1".to_owned())]);
    assert_eq!(state.ids(), vec![second]);
}

#[test]
fn clear_releases_every_preview_once() {
    let mut state = UploadState::default();
    state.stage(UploadMode::Multiple, FileMeta::new("a.png", "image/png", 1), preview(1));
    state.stage(UploadMode::Multiple, pdf("b.pdf", 1), None);
    state.stage(UploadMode::Multiple, FileMeta::new("c.png", "image/png", 1), preview(3));

    let released: Vec<String> = state.clear().into_iter().map(PreviewUrl::into_inner).collect();
    assert_eq!(released, vec!["blob:preview-1".to_owned(), "blob:preview-3".to_owned()]);
    assert!(state.is_empty());
    assert!(state.clear().is_empty());
}

#[test]
fn staged_ids_are_unique() {
    let mut state = UploadState::default();
    let (a, _) = state.stage(UploadMode::Multiple, pdf("a.pdf", 1), None);
    let (b, _) = state.stage(UploadMode::Multiple, pdf("a.pdf", 1), None);
    assert_ne!(a, b);
    assert_eq!(state.len(), 2);
}

#[test]
fn finishing_an_upload_keeps_files_staged_meanwhile() {
    let mut state = UploadState::default();
    let (sent, _) = state.stage(UploadMode::Multiple, FileMeta::new("a.png", "image/png", 1), preview(1));
    let in_flight = state.ids();
    state.uploading = true;
    let (late, _) = state.stage(UploadMode::Multiple, FileMeta::new("b.png", "image/png", 1), preview(2));

    let released: Vec<String> = state.remove_many(&in_flight).into_iter().map(PreviewUrl::into_inner).collect();
    assert_eq!(released, vec!["blob:preview-1".to_owned()]);
    assert_eq!(state.ids(), vec![late]);
    assert!(!state.ids().contains(&sent));
    assert!(state.remove_many(&in_flight).is_empty());
}
