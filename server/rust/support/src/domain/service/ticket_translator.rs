use crate::domain::entity::{CustomFieldIds, RemoteTicket, SupportTicket, TicketComment};

/// ヘルプデスクのチケットをコンソール向けの SupportTicket に変換する。
///
/// - カスタムフィールドは設定済みの version / severity ID に一致するものだけを採用する。
/// - 最初のコメントは HTML 化された説明文として扱い、コメント一覧からは除外する。
/// - 残りのコメントは到着順を維持する。
pub fn translate_ticket(ticket: RemoteTicket, fields: &CustomFieldIds) -> SupportTicket {
    let mut opennebula_version = None;
    let mut severity = None;

    for field in ticket.custom_fields {
        if field.id == fields.version {
            opennebula_version = field.value;
        } else if field.id == fields.severity {
            severity = field.value;
        }
    }

    let mut comments = ticket.comments.into_iter();
    let html_description = comments.next().map(|first| first.html_body);
    let comments = comments
        .map(|c| TicketComment {
            created_at: c.created_at,
            html_body: c.html_body,
            author_id: c.author_id,
            body: c.body,
        })
        .collect();

    SupportTicket {
        id: ticket.id,
        url: ticket.url,
        subject: ticket.subject,
        description: ticket.description,
        status: ticket.status,
        created_at: ticket.created_at,
        updated_at: ticket.updated_at,
        opennebula_version,
        severity,
        html_description,
        comments,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::{RemoteComment, RemoteCustomField};
    use chrono::{Duration, Utc};

    const FIELDS: CustomFieldIds = CustomFieldIds {
        version: 391_130,
        severity: 391_197,
    };

    fn make_comment(n: i64, author_id: u64) -> RemoteComment {
        RemoteComment {
            created_at: Utc::now() + Duration::minutes(n),
            html_body: format!("<p>comment {}</p>", n),
            author_id,
            body: format!("comment {}", n),
        }
    }

    fn make_ticket(comments: Vec<RemoteComment>) -> RemoteTicket {
        RemoteTicket {
            id: 4201,
            url: "https://helpdesk.example.com/api/v2/requests/4201.json".to_string(),
            subject: "Datastore monitoring fails".to_string(),
            description: "monitor probe timeouts".to_string(),
            status: "open".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            custom_fields: vec![
                RemoteCustomField {
                    id: 391_130,
                    value: Some("5.12".to_string()),
                },
                RemoteCustomField {
                    id: 391_197,
                    value: Some("severity_2".to_string()),
                },
                RemoteCustomField {
                    id: 1,
                    value: Some("ignored".to_string()),
                },
            ],
            comments,
        }
    }

    #[test]
    fn test_first_comment_becomes_html_description() {
        let ticket = make_ticket(vec![
            make_comment(0, 10),
            make_comment(1, 11),
            make_comment(2, 12),
        ]);

        let translated = translate_ticket(ticket, &FIELDS);

        assert_eq!(
            translated.html_description.as_deref(),
            Some("<p>comment 0</p>")
        );
        assert_eq!(translated.comments.len(), 2);
        assert_eq!(translated.comments[0].body, "comment 1");
        assert_eq!(translated.comments[0].author_id, 11);
        assert_eq!(translated.comments[1].body, "comment 2");
        assert_eq!(translated.comments[1].author_id, 12);
    }

    #[test]
    fn test_ticket_without_comments() {
        let translated = translate_ticket(make_ticket(vec![]), &FIELDS);
        assert!(translated.html_description.is_none());
        assert!(translated.comments.is_empty());
    }

    #[test]
    fn test_single_comment_leaves_empty_list() {
        let translated = translate_ticket(make_ticket(vec![make_comment(0, 10)]), &FIELDS);
        assert!(translated.html_description.is_some());
        assert!(translated.comments.is_empty());
    }

    #[test]
    fn test_custom_fields_are_mapped_by_configured_id() {
        let translated = translate_ticket(make_ticket(vec![]), &FIELDS);
        assert_eq!(translated.opennebula_version.as_deref(), Some("5.12"));
        assert_eq!(translated.severity.as_deref(), Some("severity_2"));
    }

    #[test]
    fn test_unmatched_custom_fields_are_ignored() {
        let other = CustomFieldIds {
            version: 77,
            severity: 78,
        };
        let translated = translate_ticket(make_ticket(vec![]), &other);
        assert!(translated.opennebula_version.is_none());
        assert!(translated.severity.is_none());
    }

    #[test]
    fn test_scalar_fields_are_copied() {
        let translated = translate_ticket(make_ticket(vec![]), &FIELDS);
        assert_eq!(translated.id, 4201);
        assert_eq!(translated.subject, "Datastore monitoring fails");
        assert_eq!(translated.status, "open");
    }
}
